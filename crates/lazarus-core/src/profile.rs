use crate::CoreError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

/// Visual status of a single step while a sequence plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Running,
    Completed,
}

/// Immutable step template carried by a profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepSpec {
    pub id: String,
    pub message: String,
    pub duration_ms: u64,
}

/// Runtime copy of a step, created when a sequence starts and mutated in
/// place as the sequencer advances. Discarded when the session goes offline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogStep {
    pub id: String,
    pub message: String,
    pub duration_ms: u64,
    pub status: StepStatus,
}

impl LogStep {
    #[must_use]
    pub fn from_spec(spec: &StepSpec) -> Self {
        Self {
            id: spec.id.clone(),
            message: spec.message.clone(),
            duration_ms: spec.duration_ms,
            status: StepStatus::Pending,
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Profile flavor. Rendering picks a glyph/label from this tag; adding a
/// kind is an enum arm plus one row here, never a string comparison chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileKind {
    Server,
    Compute,
    Database,
}

impl ProfileKind {
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            ProfileKind::Server => "▣",
            ProfileKind::Compute => "⚙",
            ProfileKind::Database => "⛁",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            ProfileKind::Server => "Server",
            ProfileKind::Compute => "Compute",
            ProfileKind::Database => "Database",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricSpec {
    pub id: String,
    pub label: String,
    pub unit: String,
}

/// Hourly rates used by the cost panels. Fixed reference data, not derived
/// from any server response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CostModel {
    pub on_demand_rate: f64,
    pub spot_rate: f64,
}

impl CostModel {
    /// Fraction of the on-demand rate saved while running on spot.
    #[must_use]
    pub fn savings_fraction(&self) -> f64 {
        if self.on_demand_rate <= 0.0 {
            return 0.0;
        }
        1.0 - self.spot_rate / self.on_demand_rate
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            on_demand_rate: 0.084,
            spot_rate: 0.024,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationProfile {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: ProfileKind,
    pub build_sequence: Vec<StepSpec>,
    pub boot_sequence: Vec<StepSpec>,
    pub metrics: Vec<MetricSpec>,
    pub cost: CostModel,
}

#[derive(Debug, Clone)]
pub struct ProfileCatalog {
    pub profiles: Vec<SimulationProfile>,
}

impl ProfileCatalog {
    /// The compiled-in catalog used when no HCL file is given.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            profiles: vec![
                builtin_payments_api(),
                builtin_ml_training(),
                builtin_analytics_db(),
            ],
        }
    }

    /// Parse a catalog from an HCL file path.
    ///
    /// # Errors
    /// Returns `CoreError` if the file cannot be read or the contents cannot
    /// be parsed.
    pub fn from_file(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse a catalog from an HCL string.
    ///
    /// # Errors
    /// Returns `CoreError` if the HCL is invalid or required fields are
    /// missing.
    pub fn parse(content: &str) -> Result<Self, CoreError> {
        let body: hcl::Body =
            hcl::from_str(content).map_err(|e| CoreError::HclParse(e.to_string()))?;

        let mut profiles = Vec::new();
        for block in body.blocks() {
            if block.identifier.as_str() == "profile" {
                profiles.push(parse_profile(block)?);
            }
        }

        if profiles.is_empty() {
            return Err(CoreError::InvalidProfile("No profile block found".into()));
        }

        let catalog = Self { profiles };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Validate identifiers and step durations.
    ///
    /// # Errors
    /// Returns `CoreError` on duplicate ids or non-positive durations.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for profile in &self.profiles {
            if !seen.insert(profile.id.as_str()) {
                return Err(CoreError::InvalidProfile(format!(
                    "Duplicate profile id '{}'",
                    profile.id
                )));
            }
            validate_sequence(&profile.id, "build_step", &profile.build_sequence)?;
            validate_sequence(&profile.id, "boot_step", &profile.boot_sequence)?;
        }
        Ok(())
    }

    /// Look up a profile by id.
    ///
    /// # Errors
    /// Returns `CoreError::ProfileNotFound` if the id is unknown.
    pub fn get(&self, id: &str) -> Result<&SimulationProfile, CoreError> {
        self.profiles
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| CoreError::ProfileNotFound(id.to_string()))
    }
}

fn validate_sequence(profile: &str, block: &str, steps: &[StepSpec]) -> Result<(), CoreError> {
    let mut seen: HashSet<&str> = HashSet::new();
    for step in steps {
        if step.duration_ms == 0 {
            return Err(CoreError::InvalidProfile(format!(
                "Profile '{profile}' {block} '{}' has zero duration",
                step.id
            )));
        }
        if !seen.insert(step.id.as_str()) {
            return Err(CoreError::InvalidProfile(format!(
                "Profile '{profile}' has duplicate {block} '{}'",
                step.id
            )));
        }
    }
    Ok(())
}

fn parse_profile(block: &hcl::Block) -> Result<SimulationProfile, CoreError> {
    let id = block
        .labels
        .first()
        .map(|l| l.as_str().to_string())
        .ok_or_else(|| CoreError::InvalidProfile("Missing profile id".into()))?;

    let mut name = String::new();
    let mut description = String::new();
    let mut kind: Option<ProfileKind> = None;
    let mut build_sequence = Vec::new();
    let mut boot_sequence = Vec::new();
    let mut metrics = Vec::new();
    let mut cost = CostModel::default();

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "name" => name = extract_string(&attr.expr)?,
            "description" => description = extract_string(&attr.expr)?,
            "kind" => kind = Some(parse_kind(&id, &extract_string(&attr.expr)?)?),
            _ => {}
        }
    }

    for inner_block in block.body.blocks() {
        match inner_block.identifier.as_str() {
            "build_step" => build_sequence.push(parse_step(inner_block)?),
            "boot_step" => boot_sequence.push(parse_step(inner_block)?),
            "metric" => metrics.push(parse_metric(inner_block)?),
            "cost" => cost = parse_cost(inner_block)?,
            _ => {}
        }
    }

    if name.is_empty() {
        return Err(CoreError::InvalidProfile(format!(
            "Profile '{id}' missing name"
        )));
    }

    let kind = kind
        .ok_or_else(|| CoreError::InvalidProfile(format!("Profile '{id}' missing kind")))?;

    Ok(SimulationProfile {
        id,
        name,
        description,
        kind,
        build_sequence,
        boot_sequence,
        metrics,
        cost,
    })
}

fn parse_kind(profile: &str, value: &str) -> Result<ProfileKind, CoreError> {
    match value {
        "server" => Ok(ProfileKind::Server),
        "compute" => Ok(ProfileKind::Compute),
        "database" => Ok(ProfileKind::Database),
        other => Err(CoreError::InvalidProfile(format!(
            "Profile '{profile}' kind must be server|compute|database, got '{other}'"
        ))),
    }
}

fn parse_step(block: &hcl::Block) -> Result<StepSpec, CoreError> {
    let id = block
        .labels
        .first()
        .map(|l| l.as_str().to_string())
        .ok_or_else(|| CoreError::InvalidProfile("step block missing id".into()))?;

    let mut message = String::new();
    let mut duration_ms: u64 = 0;

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "message" => message = extract_string(&attr.expr)?,
            "duration_ms" => duration_ms = extract_u64(&attr.expr)?,
            _ => {}
        }
    }

    if message.is_empty() {
        return Err(CoreError::InvalidProfile(format!(
            "step '{id}' missing message"
        )));
    }

    Ok(StepSpec {
        id,
        message,
        duration_ms,
    })
}

fn parse_metric(block: &hcl::Block) -> Result<MetricSpec, CoreError> {
    let id = block
        .labels
        .first()
        .map(|l| l.as_str().to_string())
        .ok_or_else(|| CoreError::InvalidProfile("metric block missing id".into()))?;

    let mut label = String::new();
    let mut unit = String::new();

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "label" => label = extract_string(&attr.expr)?,
            "unit" => unit = extract_string(&attr.expr)?,
            _ => {}
        }
    }

    if label.is_empty() {
        return Err(CoreError::InvalidProfile(format!(
            "metric '{id}' missing label"
        )));
    }

    Ok(MetricSpec { id, label, unit })
}

fn parse_cost(block: &hcl::Block) -> Result<CostModel, CoreError> {
    let mut cost = CostModel::default();

    for attr in block.body.attributes() {
        match attr.key.as_str() {
            "on_demand_rate" => cost.on_demand_rate = extract_f64(&attr.expr)?,
            "spot_rate" => cost.spot_rate = extract_f64(&attr.expr)?,
            _ => {}
        }
    }

    if cost.on_demand_rate <= 0.0 || cost.spot_rate <= 0.0 {
        return Err(CoreError::InvalidProfile(
            "cost rates must be positive".into(),
        ));
    }

    Ok(cost)
}

fn extract_string(expr: &hcl::Expression) -> Result<String, CoreError> {
    match expr {
        hcl::Expression::String(s) => Ok(s.clone()),
        _ => Err(CoreError::InvalidProfile(format!(
            "Expected string, got {expr:?}"
        ))),
    }
}

fn extract_u64(expr: &hcl::Expression) -> Result<u64, CoreError> {
    match expr {
        hcl::Expression::Number(n) => n
            .as_u64()
            .ok_or_else(|| CoreError::InvalidProfile(format!("Expected integer, got {n}"))),
        _ => Err(CoreError::InvalidProfile(format!(
            "Expected number, got {expr:?}"
        ))),
    }
}

fn extract_f64(expr: &hcl::Expression) -> Result<f64, CoreError> {
    match expr {
        hcl::Expression::Number(n) => n
            .as_f64()
            .ok_or_else(|| CoreError::InvalidProfile(format!("Expected float, got {n}"))),
        _ => Err(CoreError::InvalidProfile(format!(
            "Expected number, got {expr:?}"
        ))),
    }
}

fn step(id: &str, message: &str, duration_ms: u64) -> StepSpec {
    StepSpec {
        id: id.into(),
        message: message.into(),
        duration_ms,
    }
}

fn default_metrics() -> Vec<MetricSpec> {
    vec![
        MetricSpec {
            id: "cpu".into(),
            label: "CPU Usage".into(),
            unit: "%".into(),
        },
        MetricSpec {
            id: "memory".into(),
            label: "Memory Usage".into(),
            unit: "%".into(),
        },
    ]
}

fn builtin_payments_api() -> SimulationProfile {
    SimulationProfile {
        id: "payments-api".into(),
        name: "Payments API Sandbox".into(),
        description: "Web service tier with a live traffic simulator and KYC endpoints.".into(),
        kind: ProfileKind::Server,
        build_sequence: vec![
            step("context", "Sending build context to daemon (14.2MB)", 400),
            step("base", "Step 1/6 : FROM node:20-alpine", 600),
            step("deps", "Step 2/6 : RUN npm ci --omit=dev", 1400),
            step("copy", "Step 3/6 : COPY . /srv/app", 500),
            step("compile", "Step 4/6 : RUN npm run build", 1200),
            step("layers", "Exporting layers and writing manifest", 700),
            step("tag", "Successfully tagged dev-payments:latest", 300),
        ],
        boot_sequence: vec![
            step("request", "Request received", 600),
            step("status", "Checking environment status", 800),
            step("spot", "Attempting Spot capacity allocation", 1200),
            step("compute", "Waiting for compute resources", 1500),
            step("disk", "Attaching persistent disk", 900),
            step("services", "Booting services", 1100),
            step("health", "Running health checks", 800),
        ],
        metrics: default_metrics(),
        cost: CostModel::default(),
    }
}

fn builtin_ml_training() -> SimulationProfile {
    SimulationProfile {
        id: "ml-training".into(),
        name: "ML Training Rig".into(),
        description: "GPU-heavy batch environment for model training runs.".into(),
        kind: ProfileKind::Compute,
        build_sequence: vec![
            step("context", "Sending build context to daemon (1.3GB)", 900),
            step("base", "Step 1/5 : FROM nvidia/cuda:12.4-runtime", 800),
            step("wheels", "Step 2/5 : RUN pip install -r requirements.txt", 2200),
            step("weights", "Step 3/5 : COPY checkpoints /opt/weights", 1600),
            step("layers", "Exporting layers and writing manifest", 700),
            step("tag", "Successfully tagged trainer:latest", 300),
        ],
        boot_sequence: vec![
            step("request", "Request received", 600),
            step("status", "Checking environment status", 800),
            step("spot", "Attempting Spot GPU allocation", 1800),
            step("compute", "Waiting for accelerator resources", 2000),
            step("disk", "Attaching dataset volume", 1000),
            step("services", "Starting training daemons", 1200),
            step("health", "Running health checks", 800),
        ],
        metrics: default_metrics(),
        cost: CostModel {
            on_demand_rate: 0.48,
            spot_rate: 0.14,
        },
    }
}

fn builtin_analytics_db() -> SimulationProfile {
    SimulationProfile {
        id: "analytics-db".into(),
        name: "Analytics Warehouse".into(),
        description: "Columnar store replica for ad-hoc analyst queries.".into(),
        kind: ProfileKind::Database,
        build_sequence: vec![
            step("context", "Sending build context to daemon (82MB)", 500),
            step("base", "Step 1/4 : FROM postgres:16-bookworm", 700),
            step("extensions", "Step 2/4 : RUN install-extensions timescaledb", 1300),
            step("conf", "Step 3/4 : COPY postgresql.conf /etc/postgresql", 400),
            step("tag", "Successfully tagged warehouse:latest", 300),
        ],
        boot_sequence: vec![
            step("request", "Request received", 600),
            step("status", "Checking environment status", 800),
            step("spot", "Attempting Spot capacity allocation", 1200),
            step("disk", "Attaching persistent disk", 1400),
            step("replay", "Replaying WAL segments", 1800),
            step("services", "Booting services", 1000),
            step("health", "Running health checks", 800),
        ],
        metrics: default_metrics(),
        cost: CostModel::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = ProfileCatalog::builtin();
        catalog.validate().unwrap();
        assert_eq!(catalog.profiles.len(), 3);
        assert!(catalog.get("payments-api").is_ok());
        assert!(matches!(
            catalog.get("nope"),
            Err(CoreError::ProfileNotFound(_))
        ));
    }

    #[test]
    fn test_parse_catalog() {
        let hcl = r#"
profile "edge-cache" {
  name        = "Edge Cache"
  description = "Regional cache node"
  kind        = "server"

  cost {
    on_demand_rate = 0.12
    spot_rate      = 0.03
  }

  build_step "base" {
    message     = "Step 1/2 : FROM varnish:7"
    duration_ms = 500
  }

  boot_step "request" {
    message     = "Request received"
    duration_ms = 700
  }

  boot_step "warm" {
    message     = "Warming cache shards"
    duration_ms = 900
  }

  metric "cpu" {
    label = "CPU Usage"
    unit  = "%"
  }
}
"#;

        let catalog = ProfileCatalog::parse(hcl).unwrap();
        assert_eq!(catalog.profiles.len(), 1);
        let profile = &catalog.profiles[0];
        assert_eq!(profile.id, "edge-cache");
        assert_eq!(profile.kind, ProfileKind::Server);
        assert_eq!(profile.build_sequence.len(), 1);
        assert_eq!(profile.boot_sequence.len(), 2);
        assert_eq!(profile.boot_sequence[1].id, "warm");
        assert!((profile.cost.spot_rate - 0.03).abs() < f64::EPSILON);
        assert_eq!(profile.metrics.len(), 1);
    }

    #[test]
    fn test_zero_duration_rejected() {
        let hcl = r#"
profile "bad" {
  name = "Bad"
  kind = "server"

  boot_step "stuck" {
    message     = "Never finishes"
    duration_ms = 0
  }
}
"#;

        let err = ProfileCatalog::parse(hcl).unwrap_err();
        match err {
            CoreError::InvalidProfile(msg) => assert!(msg.contains("zero duration")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let hcl = r#"
profile "bad" {
  name = "Bad"
  kind = "mainframe"
}
"#;

        let err = ProfileCatalog::parse(hcl).unwrap_err();
        match err {
            CoreError::InvalidProfile(msg) => assert!(msg.contains("mainframe")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_log_step_carries_spec_duration() {
        let spec = StepSpec {
            id: "spot".into(),
            message: "Attempting Spot capacity allocation".into(),
            duration_ms: 1200,
        };
        let log_step = LogStep::from_spec(&spec);
        assert_eq!(log_step.status, StepStatus::Pending);
        assert_eq!(log_step.duration(), Duration::from_millis(1200));
    }

    #[test]
    fn test_savings_fraction() {
        let cost = CostModel {
            on_demand_rate: 0.084,
            spot_rate: 0.024,
        };
        let fraction = cost.savings_fraction();
        assert!(fraction > 0.71 && fraction < 0.72);
    }
}
