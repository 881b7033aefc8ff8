use crate::acquire::repeaterbook::RecordSource;
use crate::render::map::render_map;
use crate::render::page::{render_index, render_repeaters};
use crate::workflow::config::WorkflowConfig;
use crate::workflow::output::{pack_archive, write_atomically};
use anyhow::Context;
use chrono::Local;
use log::{info, warn};
use rptcore::cluster::{MapPin, ProximityClusterer};
use rptcore::export::{ChannelTable, DualModeExporter, GenericFmExporter};
use rptcore::prelude::ChannelExporter;
use rptcore::record::{Registry, RepeaterRecord};
use std::fs;
use std::path::{Path, PathBuf};

/// What the caller wants this invocation to do to the registry.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Rebuild outputs only; never touch the registry.
    pub regen: bool,
    pub lookup_id: Option<String>,
    /// Fields that win over the looked-up record.
    pub overrides: RepeaterRecord,
}

pub struct WorkflowResult {
    pub registry_size: usize,
    pub group_count: usize,
    pub appended: Option<RepeaterRecord>,
    pub chirp: ChannelTable,
    pub d878: ChannelTable,
    pub pins: Vec<MapPin>,
    /// Every file written, in write order.
    pub written: Vec<PathBuf>,
}

pub struct Runner {
    config: WorkflowConfig,
    source: Box<dyn RecordSource>,
}

impl Runner {
    pub fn new(config: WorkflowConfig, source: Box<dyn RecordSource>) -> Self {
        Self { config, source }
    }

    pub fn execute(&self, request: &RunRequest) -> anyhow::Result<WorkflowResult> {
        let mut registry = Registry::load(&self.config.registry)
            .with_context(|| format!("loading registry {}", self.config.registry.display()))?;

        let appended = if request.regen {
            None
        } else {
            self.add_candidate(&mut registry, request)?
        };

        let chirp = GenericFmExporter::new(self.config.generic_fm.clone())
            .export(registry.records());
        println!("{}", chirp.summary());
        let d878 =
            DualModeExporter::new(self.config.dual_mode.clone()).export(registry.records());
        println!("{}", d878.summary());
        let pins = ProximityClusterer::new(self.config.cluster_threshold).pins(registry.records());

        // Everything is rendered before the first write, so a missing
        // template or sidecar leaves the previous outputs in place.
        let mut outputs: Vec<(PathBuf, Vec<u8>)> = vec![
            (self.config.chirp_csv.clone(), chirp.to_csv_bytes()?),
            (self.config.d878_csv.clone(), d878.to_csv_bytes()?),
        ];
        if let Some(archive) = &self.config.d878_archive {
            let bundle = self.d878_archive(&outputs[1].1)?;
            outputs.push((archive.clone(), bundle));
        }
        if let Some(page) = &self.config.index_page {
            let updated = Local::now().naive_local();
            let text = render_index(
                page.read_template()?.as_deref(),
                registry.len(),
                registry.group_count(),
                updated,
            );
            outputs.push((page.output.clone(), text.into_bytes()));
        }
        if let Some(page) = &self.config.repeaters_page {
            let text = render_repeaters(page.read_template()?.as_deref(), registry.records());
            outputs.push((page.output.clone(), text.into_bytes()));
        }
        for page in &self.config.map_pages {
            let text = render_map(page.read_template()?.as_deref(), &pins);
            outputs.push((page.output.clone(), text.into_bytes()));
        }

        let mut written = Vec::with_capacity(outputs.len());
        for (path, contents) in outputs {
            write_atomically(&path, &contents)
                .with_context(|| format!("writing {}", path.display()))?;
            written.push(path);
        }

        info!(
            "exported {} repeaters in {} groups: {} CHIRP channels, {} D878 channels, {} map pins, {} files",
            registry.len(),
            registry.group_count(),
            chirp.kept(),
            d878.kept(),
            pins.len(),
            written.len()
        );

        Ok(WorkflowResult {
            registry_size: registry.len(),
            group_count: registry.group_count(),
            appended,
            chirp,
            d878,
            pins,
            written,
        })
    }

    /// Looks up the candidate, applies the overrides, and rewrites the
    /// registry with it appended. A lookup failure leaves the file untouched.
    fn add_candidate(
        &self,
        registry: &mut Registry,
        request: &RunRequest,
    ) -> anyhow::Result<Option<RepeaterRecord>> {
        let looked_up = self
            .source
            .lookup(request.lookup_id.as_deref())
            .context("looking up new repeater")?;
        let candidate = looked_up.merge(request.overrides.clone());

        if candidate.callsign.is_none() {
            warn!("new repeater has no callsign; registry left unchanged");
            return Ok(None);
        }

        registry.append(candidate.clone());
        let text = registry.to_json_pretty()?;
        write_atomically(&self.config.registry, text.as_bytes())
            .context("rewriting registry")?;
        info!("added {} to the registry", candidate.display_name());
        Ok(Some(candidate))
    }

    /// The D878 channel list followed by its sidecars, each stored under
    /// its file name.
    fn d878_archive(&self, channels: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut entries = vec![(entry_name(&self.config.d878_csv)?, channels.to_vec())];
        for sidecar in &self.config.d878_sidecars {
            let contents = fs::read(sidecar)
                .with_context(|| format!("reading D878 sidecar {}", sidecar.display()))?;
            entries.push((entry_name(sidecar)?, contents));
        }
        pack_archive(&entries)
    }
}

fn entry_name(path: &Path) -> anyhow::Result<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))
}
