use crate::record::Coordinates;

/// Flat Euclidean distance in coordinate units; no geodesic correction.
pub fn euclidean(a: Coordinates, b: Coordinates) -> f64 {
    (a.lat - b.lat).hypot(a.lon - b.lon)
}

/// Symmetric pairwise distance matrix, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    values: Vec<f64>,
}

impl DistanceMatrix {
    pub fn from_points(points: &[Coordinates]) -> Self {
        let size = points.len();
        let mut values = vec![0.0; size * size];
        for i in 0..size {
            for j in (i + 1)..size {
                let d = euclidean(points[i], points[j]);
                values[i * size + j] = d;
                values[j * size + i] = d;
            }
        }
        Self { size, values }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, value: f64) {
        self.values[i * self.size + j] = value;
        self.values[j * self.size + i] = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let points = [
            Coordinates::new(0.0, 0.0),
            Coordinates::new(3.0, 4.0),
            Coordinates::new(0.0, 1.0),
        ];
        let matrix = DistanceMatrix::from_points(&points);
        assert_eq!(matrix.len(), 3);
        assert_eq!(matrix.get(0, 1), 5.0);
        assert_eq!(matrix.get(1, 0), 5.0);
        assert_eq!(matrix.get(2, 2), 0.0);
    }
}
