use snafu::Snafu;

pub mod admin;
pub mod codec;
pub mod menus;
pub mod models;
pub mod store;
pub mod sync;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ElectError {
    #[snafu(display("Error reading {name}"))]
    ReadingResource {
        source: std::io::Error,
        name: &'static str,
    },
    #[snafu(display("Error writing {name}"))]
    WritingResource {
        source: std::io::Error,
        name: &'static str,
    },
    #[snafu(display("Error creating {name}"))]
    CreatingResource {
        source: std::io::Error,
        name: &'static str,
    },
    #[snafu(display("Error writing the results summary to {path}"))]
    ExportingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(""))]
    SerializingSummary { source: serde_json::Error },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type ElectResult<T> = Result<T, ElectError>;
