use crate::app::transformer::RewriteRules;
use crate::domain::keys;
use crate::domain::{DbmsType, PropertyStore};

/// Database-platform-specific pieces of the replicator configuration,
/// selected by a plain switch on the configured database kind.
#[derive(Debug, Clone, Copy)]
pub struct DbmsFlavor {
    dbms: DbmsType,
}

impl DbmsFlavor {
    pub fn new(dbms: DbmsType) -> Self {
        Self { dbms }
    }

    pub fn dbms(&self) -> DbmsType {
        self.dbms
    }

    pub fn jdbc_driver(&self) -> &'static str {
        match self.dbms {
            DbmsType::Mysql => "com.mysql.jdbc.Driver",
            DbmsType::Postgresql => "org.postgresql.Driver",
            DbmsType::Oracle => "oracle.jdbc.OracleDriver",
        }
    }

    /// Rule table for the replicator services.properties file.
    pub fn services_rules(&self, config: &PropertyStore) -> RewriteRules {
        let host = config.get_or(&[keys::HOST], "localhost");
        let mut rules = RewriteRules::new()
            .set_property("replicator.host", host.clone())
            .set_property("replicator.role", config.get_or(&[keys::REPL_ROLE], "slave"))
            .set_property(
                "replicator.global.db.user",
                config.get_or(&[keys::REPL_DBLOGIN], ""),
            )
            .set_property(
                "replicator.global.db.password",
                config.get_or(&[keys::REPL_DBPASSWORD], ""),
            )
            .set_property("replicator.resourceDataServerHost", host.clone())
            .set_property(
                "replicator.resourcePort",
                config.get_or(&[keys::REPL_DBPORT], self.dbms.default_port()),
            )
            .set_property("replicator.resourceJdbcDriver", self.jdbc_driver())
            .set_property("replicator.source_id", host)
            .set_property("replicator.resourceVendor", self.dbms.as_str())
            .set_property("cluster.name", config.get_or(&[keys::CLUSTERNAME], ""));

        rules = match self.dbms {
            DbmsType::Mysql => rules
                .set_property(
                    "replicator.resourceLogDir",
                    config.get_or(&[keys::REPL_MYSQL_BINLOGDIR], "/var/lib/mysql"),
                )
                .set_property(
                    "replicator.resourceLogPattern",
                    config.get_or(&[keys::REPL_MYSQL_BINLOGPATTERN], "mysql-bin"),
                ),
            DbmsType::Postgresql => rules.set_property(
                "replicator.resourceLogDir",
                config.get_or(&[keys::REPL_PG_ARCHIVE_DIR], "/var/lib/pgsql/archive"),
            ),
            DbmsType::Oracle => rules,
        };

        if config.get(&[keys::REPL_LOG_TYPE]) == Some("disk") {
            rules = rules.set_property(
                "replicator.resourceDiskLogDir",
                config.get_or(&[keys::REPL_LOG_DIR], ""),
            );
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mysql_rules_carry_binlog_settings() {
        let mut config = PropertyStore::new();
        config.set(&["host_name"], "db1");
        config.set(&["repl_mysql_binlog_dir"], "/var/log/mysql");
        let flavor = DbmsFlavor::new(DbmsType::Mysql);
        let rules = flavor.services_rules(&config);

        assert_eq!(
            rules.apply("replicator.resourceLogDir="),
            Some("replicator.resourceLogDir=/var/log/mysql".to_string())
        );
        assert_eq!(
            rules.apply("replicator.resourceJdbcDriver="),
            Some("replicator.resourceJdbcDriver=com.mysql.jdbc.Driver".to_string())
        );
    }

    #[test]
    fn postgresql_rules_use_the_archive_directory() {
        let mut config = PropertyStore::new();
        config.set(&["dbms_type"], "postgresql");
        let flavor = DbmsFlavor::new(DbmsType::Postgresql);
        let rules = flavor.services_rules(&config);

        assert_eq!(
            rules.apply("replicator.resourceLogDir="),
            Some("replicator.resourceLogDir=/var/lib/pgsql/archive".to_string())
        );
        assert_eq!(
            rules.apply("replicator.resourceVendor="),
            Some("replicator.resourceVendor=postgresql".to_string())
        );
    }
}
