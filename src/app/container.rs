use std::sync::Arc;

use crate::adapters::{
    AppConfig, CsvTableAdapter, ExecFfmpegAdapter, FsLocalAdapter, ProbeLibavAdapter,
};
use crate::app::{
    convert_interactor::ConvertInteractor, extract_interactor::ExtractInteractor,
    inspect_interactor::InspectInteractor, summarize_interactor::SummarizeInteractor,
};
use crate::domain::errors::DomainError;
use crate::ports::{ExecutePort, FsPort, ProbePort, TablePort};

pub trait AppContainer: Send + Sync {
    fn extract_interactor(&self) -> Arc<ExtractInteractor>;
    fn convert_interactor(&self) -> Arc<ConvertInteractor>;
    fn summarize_interactor(&self) -> Arc<SummarizeInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
    fn table_port(&self) -> Arc<dyn TablePort>;
}

pub struct DefaultAppContainer {
    extract_interactor: Arc<ExtractInteractor>,
    convert_interactor: Arc<ConvertInteractor>,
    summarize_interactor: Arc<SummarizeInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
    table_port: Arc<dyn TablePort>,
}

impl DefaultAppContainer {
    pub fn new(config: &AppConfig) -> Result<Self, DomainError> {
        let probe_port: Arc<dyn ProbePort> = Arc::new(ProbeLibavAdapter::new()?);
        let execute_port: Arc<dyn ExecutePort> =
            Arc::new(ExecFfmpegAdapter::new(config.ffmpeg_path.clone()));
        let fs_port: Arc<dyn FsPort> = Arc::new(FsLocalAdapter::new());
        let table_port: Arc<dyn TablePort> = Arc::new(CsvTableAdapter::new());
        let settings = config.encode_settings();

        let extract_interactor = Arc::new(ExtractInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
        ));

        let convert_interactor = Arc::new(ConvertInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
            settings.clone(),
        ));

        let summarize_interactor = Arc::new(SummarizeInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&execute_port),
            Arc::clone(&fs_port),
            settings,
        ));

        let inspect_interactor = Arc::new(InspectInteractor::new(
            Arc::clone(&probe_port),
            Arc::clone(&fs_port),
        ));

        Ok(Self {
            extract_interactor,
            convert_interactor,
            summarize_interactor,
            inspect_interactor,
            table_port,
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn extract_interactor(&self) -> Arc<ExtractInteractor> {
        Arc::clone(&self.extract_interactor)
    }

    fn convert_interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.convert_interactor)
    }

    fn summarize_interactor(&self) -> Arc<SummarizeInteractor> {
        Arc::clone(&self.summarize_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }

    fn table_port(&self) -> Arc<dyn TablePort> {
        Arc::clone(&self.table_port)
    }
}
