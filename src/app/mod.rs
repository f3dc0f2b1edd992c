// Application layer - Use case interactors

use std::path::Path;

use crate::domain::errors::*;
use crate::domain::model::ContainerFormat;
use crate::ports::FsPort;

pub mod container;
pub mod convert_interactor;
pub mod extract_interactor;
pub mod inspect_interactor;
pub mod summarize_interactor;

#[cfg(test)]
pub(crate) mod fakes;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use convert_interactor::ConvertInteractor;
pub use extract_interactor::ExtractInteractor;
pub use inspect_interactor::{InspectFormat, InspectInteractor, InspectRequest, InspectResponse};
pub use summarize_interactor::SummarizeInteractor;

/// Fail with `FsFail` unless `input` is an existing file
pub(crate) async fn ensure_input_exists(fs_port: &dyn FsPort, input: &Path) -> Result<(), DomainError> {
    if !fs_port.file_exists(input).await? {
        return Err(DomainError::FsFail(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }
    Ok(())
}

/// Reject sources outside avi/mov/mp4, then require the file to exist
pub(crate) async fn ensure_supported_input(
    fs_port: &dyn FsPort,
    input: &Path,
) -> Result<ContainerFormat, DomainError> {
    let format = ContainerFormat::from_path(input)?;
    ensure_input_exists(fs_port, input).await?;
    Ok(format)
}
