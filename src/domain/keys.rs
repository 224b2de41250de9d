//! Property key names shared by prompts, checks, and deployment steps.

pub const DEPLOYMENT_HOST: &str = "deployment_host";
pub const DEPLOYMENT_SERVICE: &str = "deployment_service";

pub const HOST: &str = "host_name";
pub const IP_ADDRESS: &str = "ip_address";
pub const CLUSTERNAME: &str = "cluster_name";
pub const USERID: &str = "userid";
pub const DBMS_TYPE: &str = "dbms_type";
pub const HOME_DIRECTORY: &str = "home_directory";
pub const TEMP_DIRECTORY: &str = "temp_directory";
pub const ROOT_PREFIX: &str = "root_command_prefix";
pub const SVC_INSTALL: &str = "install_svc_scripts";
pub const SVC_START: &str = "start_svc_scripts";

pub const HOSTS: &str = "hosts";
pub const WITNESSES: &str = "witnesses";
pub const REPL_SERVICES: &str = "repl_services";

pub const REPL_ROLE: &str = "repl_role";
pub const REPL_MASTERHOST: &str = "repl_master_host";
pub const REPL_MASTERPORT: &str = "repl_master_port";
pub const REPL_DATASOURCE: &str = "repl_datasource";
pub const REPL_DBHOST: &str = "repl_dbhost";
pub const REPL_DBPORT: &str = "repl_dbport";
pub const REPL_DBLOGIN: &str = "repl_admin_login";
pub const REPL_DBPASSWORD: &str = "repl_admin_password";
pub const REPL_THL_PORT: &str = "repl_thl_port";
pub const REPL_RMI_PORT: &str = "repl_rmi_port";
pub const REPL_LOG_TYPE: &str = "repl_log_type";
pub const REPL_LOG_DIR: &str = "repl_log_dir";
pub const REPL_BUFFER_SIZE: &str = "repl_buffer_size";
pub const REPL_CHANNELS: &str = "repl_channels";
pub const REPL_JAVA_MEM_SIZE: &str = "repl_java_mem_size";
pub const REPL_AUTOENABLE: &str = "repl_auto_enable";
pub const REPL_USE_BYTES: &str = "repl_use_bytes";
pub const REPL_BACKUP_METHOD: &str = "repl_backup_method";
pub const REPL_BACKUP_STORAGE_DIR: &str = "repl_backup_storage_dir";
pub const REPL_BACKUP_RETENTION: &str = "repl_backup_retention";
pub const REPL_MYSQL_BINLOGDIR: &str = "repl_mysql_binlog_dir";
pub const REPL_MYSQL_BINLOGPATTERN: &str = "repl_mysql_binlog_pattern";
pub const REPL_PG_ARCHIVE_DIR: &str = "repl_pg_archive_dir";

pub const MGR_LISTEN_PORT: &str = "mgr_listen_port";
pub const MGR_POLICY_MODE: &str = "mgr_policy_mode";
pub const ROUTER_LISTEN_PORT: &str = "router_listen_port";
pub const MON_INTERVAL_MILLISECS: &str = "mon_interval_millisecs";
