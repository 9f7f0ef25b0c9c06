use crate::service::detection::DetectionService;
use crate::service::model_loader::ModelLoader;
use crate::utils::config::Config;
use crate::utils::logging::*;
use crate::web::api::default;
use crate::web::routes;
use crate::web::utils::cors::cors;
use actix_web::web::{Data, route};
use actix_web::{App, HttpServer};
use model::ModelState;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

pub struct Service;

impl Service {
    pub async fn run() {
        logging_information!(SystemEntry::Initializing);
        let config = Config::now().await;
        Logger::set_capacity(config.log_capacity).await;
        let state = Arc::new(ModelState::new());
        let detection = Data::new(DetectionService::new(state.clone(), config.default_confidence_threshold, config.max_upload_size));
        let model_state = Data::from(state.clone());
        let http_server = loop {
            let config = Config::now().await;
            let allowed_origins = config.allowed_origins.clone();
            let (detection, model_state) = (detection.clone(), model_state.clone());
            let http_server = HttpServer::new(move || {
                App::new()
                    .wrap(cors(&allowed_origins))
                    .app_data(detection.clone())
                    .app_data(model_state.clone())
                    .configure(routes)
                    .default_service(route().to(default::default_route))
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
        ModelLoader::spawn(state, config.model.clone());
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
