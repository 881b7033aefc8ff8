use anyhow::Context;
use rptcore::cluster::DEFAULT_THRESHOLD;
use rptcore::export::{DualModeProfile, GenericFmProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A page rendered from a template. Without a template the built-in layout
/// for that page is used.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageOutput {
    #[serde(default)]
    pub template: Option<PathBuf>,
    pub output: PathBuf,
}

impl PageOutput {
    pub fn new(template: Option<&str>, output: &str) -> Self {
        Self {
            template: template.map(PathBuf::from),
            output: PathBuf::from(output),
        }
    }

    pub fn read_template(&self) -> anyhow::Result<Option<String>> {
        match &self.template {
            Some(path) => fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("reading template {}", path.display())),
            None => Ok(None),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub registry: PathBuf,
    pub chirp_csv: PathBuf,
    pub d878_csv: PathBuf,
    /// Zip bundle of the D878 channel list and its sidecars; skipped when unset.
    pub d878_archive: Option<PathBuf>,
    /// Extra files the D878 CPS import expects beside the channel list.
    pub d878_sidecars: Vec<PathBuf>,
    pub index_page: Option<PageOutput>,
    pub repeaters_page: Option<PageOutput>,
    /// Every page here gets the map pins substituted for `{{ repeater_pins }}`.
    pub map_pages: Vec<PageOutput>,
    pub cluster_threshold: f64,
    /// Details page, without the `ID` parameter.
    pub repeaterbook_url: String,
    pub generic_fm: GenericFmProfile,
    pub dual_mode: DualModeProfile,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            registry: PathBuf::from("assets/repeaters.json"),
            chirp_csv: PathBuf::from("assets/rr_frequencies.csv"),
            d878_csv: PathBuf::from("assets/d878.csv"),
            d878_archive: Some(PathBuf::from("assets/d878.zip")),
            d878_sidecars: vec![
                PathBuf::from("assets/d878-scanlist.csv"),
                PathBuf::from("assets/d878-talk-groups.csv"),
            ],
            index_page: Some(PageOutput::new(Some("assets/templates/index.md"), "index.md")),
            repeaters_page: Some(PageOutput::new(
                Some("assets/templates/repeaters.md"),
                "repeaters.md",
            )),
            map_pages: vec![
                PageOutput::new(Some("assets/templates/map.md"), "map.md"),
                PageOutput::new(Some("assets/templates/map.html"), "demo_map.html"),
            ],
            cluster_threshold: DEFAULT_THRESHOLD,
            repeaterbook_url: "https://www.repeaterbook.com/repeaters/details.php?state_id=53"
                .to_string(),
            generic_fm: GenericFmProfile::default(),
            dual_mode: DualModeProfile::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, registry: Option<PathBuf>, threshold: Option<f64>) -> Self {
        if let Some(registry) = registry {
            self.registry = registry;
        }
        if let Some(threshold) = threshold {
            self.cluster_threshold = threshold;
        }
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.cluster_threshold.is_finite() || self.cluster_threshold < 0.0 {
            anyhow::bail!(
                "cluster_threshold must be a non-negative number, got {}",
                self.cluster_threshold
            );
        }
        for band in &self.dual_mode.bands {
            if band.low_mhz >= band.high_mhz {
                anyhow::bail!("band {} has an empty frequency range", band.name);
            }
        }
        if self.d878_archive.is_none() && !self.d878_sidecars.is_empty() {
            anyhow::bail!("d878_sidecars are only packaged when d878_archive is set");
        }
        Ok(())
    }
}
