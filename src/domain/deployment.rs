/// A named unit of installation work with a weight controlling where it runs
/// in the step sequence. Methods execute in ascending weight order; equal
/// weights keep registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentMethod {
    pub name: &'static str,
    pub weight: i32,
}

impl DeploymentMethod {
    pub fn new(name: &'static str) -> Self {
        Self { name, weight: 0 }
    }

    pub fn weighted(name: &'static str, weight: i32) -> Self {
        Self { name, weight }
    }
}

/// Weight of the finishing step that writes service registrations; everything
/// else sorts before it.
pub const FINAL_STEP_WEIGHT: i32 = 10_000;

/// Which command variant is driving module selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    /// Full stack install across hosts.
    Install,
    /// Single replication-service create/update/delete.
    Service(ServiceAction),
    /// Pre-flight checks only.
    ValidateOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Create,
    Update,
    Delete,
}

/// The configured database platform, selecting prompt and step providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbmsType {
    Mysql,
    Postgresql,
    Oracle,
}

impl DbmsType {
    pub fn parse(value: &str) -> Option<DbmsType> {
        match value {
            "mysql" => Some(DbmsType::Mysql),
            "postgresql" => Some(DbmsType::Postgresql),
            "oracle" => Some(DbmsType::Oracle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DbmsType::Mysql => "mysql",
            DbmsType::Postgresql => "postgresql",
            DbmsType::Oracle => "oracle",
        }
    }

    /// Default listener port for the platform.
    pub fn default_port(&self) -> &'static str {
        match self {
            DbmsType::Mysql => "3306",
            DbmsType::Postgresql => "5432",
            DbmsType::Oracle => "1521",
        }
    }
}
