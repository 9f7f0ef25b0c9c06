pub use common::utils::log_entry::detection::DetectionEntry;
pub use common::utils::log_entry::io::IOEntry;
pub use common::utils::log_entry::model::ModelEntry;
pub use common::utils::log_entry::network::NetworkEntry;
pub use common::utils::log_entry::system::SystemEntry;
pub use common::utils::logging::*;
