//! Application-wide constants

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 28_800;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Minimum width of the daily sequence in a protocol identifier.
pub const PROTOCOL_SEQUENCE_WIDTH: usize = 4;

/// Department catalogue used when the configuration does not override it.
pub const DEFAULT_DEPARTMENTS: &[&str] = &[
    "Atendimento",
    "Conferencia de Caixa",
    "Estoque",
    "Perfumaria",
    "Financeiro",
    "RH",
    "Farmacêutico",
    "TI",
    "Supervisao",
    "Diretoria",
    "Callcenter",
    "Manutencao",
    "Gerência",
];

pub const MESSAGES_EXPORT_FILENAME: &str = "messages_audit.xlsx";
pub const LOGS_EXPORT_FILENAME: &str = "audit_logs.xlsx";
