pub use common::utils::log_entry::model::ModelEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::logging::*;
