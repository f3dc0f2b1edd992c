// Adapters - External system implementations

pub mod csv_table;
pub mod exec_ffmpeg;
pub mod fs_local;
pub mod probe_libav;
pub mod toml_config;

// Re-export adapters
pub use csv_table::CsvTableAdapter;
pub use exec_ffmpeg::ExecFfmpegAdapter;
pub use fs_local::FsLocalAdapter;
pub use probe_libav::ProbeLibavAdapter;
pub use toml_config::{AppConfig, TomlConfigAdapter};
