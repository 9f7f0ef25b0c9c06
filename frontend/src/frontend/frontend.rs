use crate::frontend::backend_client::BackendClient;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::routes;
use crate::web::utils::cors::cors;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;

pub struct Frontend;

impl Frontend {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = Config::now().await;
        let client = match BackendClient::from_config(&config) {
            Ok(client) => Data::new(client),
            Err(entry) => {
                logging_emergency!(entry);
                return;
            }
        };
        if config.keep_uploads {
            let upload_folder = Path::new(&config.upload_folder);
            if let Err(err) = fs::create_dir_all(upload_folder).await {
                logging_error!(IOEntry::CreateDirectoryError(upload_folder.display(), err));
            }
        }
        let http_server = loop {
            let config = Config::now().await;
            let allowed_origins = config.allowed_origins.clone();
            let (shared_config, client) = (Data::new(config.clone()), client.clone());
            let http_server = HttpServer::new(move || {
                App::new()
                    .wrap(cors(&allowed_origins))
                    .app_data(shared_config.clone())
                    .app_data(client.clone())
                    .configure(routes)
            })
            .bind((config.bind_address.as_str(), config.http_server_bind_port));
            match http_server {
                Ok(http_server) => break http_server,
                Err(err) => {
                    logging_critical!(NetworkEntry::BindPortError(err));
                    sleep(Duration::from_secs(config.bind_retry_duration)).await;
                    continue;
                }
            }
        };
        for address in http_server.addrs() {
            logging_information!(SystemEntry::WebReady(address));
        }
        if !client.is_available().await {
            logging_warning!(NetworkEntry::BackendUnavailable(config.backend_url.clone()));
        }
        logging_information!(SystemEntry::InitializeComplete);
        logging_information!(SystemEntry::Online);
        if let Err(err) = http_server.run().await {
            logging_emergency!(SystemEntry::WebPanic(err));
        }
    }

    pub async fn terminate() {
        logging_information!(SystemEntry::Terminating);
        logging_information!(SystemEntry::TerminateComplete);
    }
}
