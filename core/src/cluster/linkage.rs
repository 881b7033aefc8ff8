use crate::cluster::distance::DistanceMatrix;

/// Complete-linkage agglomerative clustering, cut at `threshold`.
///
/// Two clusters merge only while the largest distance between their members
/// is within the threshold, so every returned cluster has a diameter of at
/// most `threshold`. Complete linkage is monotonic, which makes stopping at
/// the first merge above the threshold the same as cutting the full
/// dendrogram there. Ties go to the lowest index pair.
///
/// Labels are numbered from 0 in order of each cluster's first member.
pub fn complete_linkage_labels(matrix: &DistanceMatrix, threshold: f64) -> Vec<usize> {
    let size = matrix.len();
    let mut linkage = matrix.clone();
    let mut parent: Vec<usize> = (0..size).collect();
    let mut active = vec![true; size];

    loop {
        let mut best: Option<(usize, usize, f64)> = None;
        for i in 0..size {
            if !active[i] {
                continue;
            }
            for j in (i + 1)..size {
                if !active[j] {
                    continue;
                }
                let d = linkage.get(i, j);
                if best.map_or(true, |(_, _, current)| d < current) {
                    best = Some((i, j, d));
                }
            }
        }

        let Some((keep, absorb, height)) = best else {
            break;
        };
        if height > threshold {
            break;
        }

        for k in 0..size {
            if active[k] && k != keep && k != absorb {
                let merged = linkage.get(keep, k).max(linkage.get(absorb, k));
                linkage.set(keep, k, merged);
            }
        }
        active[absorb] = false;
        for root in parent.iter_mut() {
            if *root == absorb {
                *root = keep;
            }
        }
    }

    let mut label_of_root: Vec<Option<usize>> = vec![None; size];
    let mut next_label = 0;
    parent
        .iter()
        .map(|&root| {
            *label_of_root[root].get_or_insert_with(|| {
                next_label += 1;
                next_label - 1
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Coordinates;

    fn labels(points: &[(f64, f64)], threshold: f64) -> Vec<usize> {
        let coords: Vec<Coordinates> = points
            .iter()
            .map(|&(lat, lon)| Coordinates::new(lat, lon))
            .collect();
        complete_linkage_labels(&DistanceMatrix::from_points(&coords), threshold)
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(labels(&[], 0.03).is_empty());
        assert_eq!(labels(&[(42.0, -71.0)], 0.03), vec![0]);
    }

    #[test]
    fn close_points_merge_and_far_points_do_not() {
        let result = labels(&[(42.0, -71.0), (42.5, -71.0), (42.01, -71.0)], 0.03);
        assert_eq!(result, vec![0, 1, 0]);
    }

    #[test]
    fn chain_longer_than_threshold_is_split() {
        // Each neighbour pair is within the threshold, the ends are not.
        let points = [(0.0, 0.0), (0.0, 0.02), (0.0, 0.045)];
        let result = labels(&points, 0.03);
        assert_eq!(result, vec![0, 0, 1]);
    }

    #[test]
    fn cluster_diameter_never_exceeds_threshold() {
        let points: Vec<(f64, f64)> = (0..12)
            .map(|i| (0.011 * i as f64, 0.007 * (i % 3) as f64))
            .collect();
        let coords: Vec<Coordinates> = points
            .iter()
            .map(|&(lat, lon)| Coordinates::new(lat, lon))
            .collect();
        let matrix = DistanceMatrix::from_points(&coords);
        let result = complete_linkage_labels(&matrix, 0.03);

        for i in 0..coords.len() {
            for j in 0..coords.len() {
                if result[i] == result[j] {
                    assert!(matrix.get(i, j) <= 0.03);
                }
            }
        }
    }

    #[test]
    fn labels_are_deterministic() {
        let points = [(1.0, 1.0), (1.01, 1.0), (2.0, 2.0), (1.0, 1.02), (2.0, 2.01)];
        assert_eq!(labels(&points, 0.03), labels(&points, 0.03));
    }
}
