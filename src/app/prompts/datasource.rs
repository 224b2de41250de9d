//! Database connection and backup prompts. The backup method validator and
//! the platform-specific keys follow the configured database type, so a
//! MySQL key left in a PostgreSQL configuration is flagged for removal.

use std::env;

use crate::domain::keys;
use crate::domain::{DbmsType, Disabled, PromptDescriptor, PropertyStore, Validator};

pub const GROUP_WEIGHT: i32 = -10;

fn is_mysql(store: &PropertyStore) -> bool {
    store.get_or(&[keys::DBMS_TYPE], "mysql") == "mysql"
}

fn is_postgresql(store: &PropertyStore) -> bool {
    store.get_or(&[keys::DBMS_TYPE], "mysql") == "postgresql"
}

fn backup_wanted(store: &PropertyStore) -> bool {
    store.get_or(&[keys::REPL_BACKUP_METHOD], "none") != "none"
}

pub fn datasource_prompts(dbms: DbmsType, store: &PropertyStore) -> Vec<PromptDescriptor> {
    let login = env::var("USER").unwrap_or_else(|_| "tungsten".to_string());
    let backup_dir = format!(
        "{}/backups",
        store.get_or(&[keys::HOME_DIRECTORY], "/opt/clusterkit")
    );
    let backup_validator = match dbms {
        DbmsType::Mysql => Validator::MysqlBackupMethod,
        DbmsType::Postgresql => Validator::PgBackupMethod,
        DbmsType::Oracle => Validator::Any,
    };

    let mut prompts = vec![
        PromptDescriptor::new(keys::REPL_DATASOURCE, "Replication datasource", Validator::Any)
            .enabled_if(|s| s.get(&[keys::REPL_DATASOURCE]).is_some()),
        PromptDescriptor::new(
            keys::REPL_DBHOST,
            "Database server hostname",
            Validator::Hostname,
        )
        .with_default("localhost"),
        PromptDescriptor::new(keys::REPL_DBPORT, "Database server port", Validator::Integer)
            .with_default(dbms.default_port().to_string()),
        PromptDescriptor::new(
            keys::REPL_DBLOGIN,
            "Database login for replication",
            Validator::Identifier,
        )
        .with_default(login),
        PromptDescriptor::new(keys::REPL_DBPASSWORD, "Database password", Validator::Any)
            .with_default(""),
        PromptDescriptor::new(keys::REPL_BACKUP_METHOD, "Database backup method", backup_validator)
            .with_default("none"),
        PromptDescriptor::new(
            keys::REPL_BACKUP_STORAGE_DIR,
            "Backup permanent shared storage",
            Validator::FileName,
        )
        .with_default(backup_dir)
        .enabled_if(backup_wanted)
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(
            keys::REPL_BACKUP_RETENTION,
            "Number of backups to retain",
            Validator::Integer,
        )
        .with_default("3")
        .enabled_if(backup_wanted)
        .when_disabled(Disabled::Remove),
    ];
    prompts.extend(mysql_prompts());
    prompts.extend(postgresql_prompts());
    prompts.into_iter().map(|p| p.with_weight(GROUP_WEIGHT)).collect()
}

fn mysql_prompts() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor::new(
            keys::REPL_MYSQL_BINLOGDIR,
            "MySQL binlog directory",
            Validator::FileName,
        )
        .with_default("/var/lib/mysql")
        .enabled_if(is_mysql)
        .when_disabled(Disabled::Remove),
        PromptDescriptor::new(
            keys::REPL_MYSQL_BINLOGPATTERN,
            "MySQL binlog pattern",
            Validator::Any,
        )
        .with_default("mysql-bin")
        .enabled_if(is_mysql)
        .when_disabled(Disabled::Remove)
        .advanced(),
    ]
}

fn postgresql_prompts() -> Vec<PromptDescriptor> {
    vec![
        PromptDescriptor::new(
            keys::REPL_PG_ARCHIVE_DIR,
            "PostgreSQL WAL archive directory",
            Validator::FileName,
        )
        .with_default("/var/lib/pgsql/archive")
        .enabled_if(is_postgresql)
        .when_disabled(Disabled::Remove),
    ]
}
