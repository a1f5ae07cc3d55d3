use std::{
    io,
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use anyhow::Context;
use axum::{http::Request, middleware, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Settings,
    domain::subscriber::email::Email,
    email::EmailClient,
    store::{self, SubscriberStore},
};

mod cors;
mod diagnostics;
mod error;
mod gate;
mod health;
mod import;
mod registration;
mod setup;
mod subscribers;
mod support;

pub use self::gate::{Access, AccessPolicy, HostOriginPolicy, RequestInfo};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SubscriberStore>,
    email_client: EmailClient,
    inboxes: Arc<Inboxes>,
    access_policy: Arc<dyn AccessPolicy>,
}

/// Internal addresses that receive notifications.
struct Inboxes {
    signups: Vec<Email>,
    support: Email,
}

fn app_router(admin_cors: CorsLayer) -> Router<AppState> {
    let admin_api = subscribers::router()
        .merge(import::router())
        .merge(setup::router())
        .layer(admin_cors);

    health::router()
        .merge(registration::router())
        .merge(support::router())
        .merge(diagnostics::router())
        .merge(admin_api)
}

pub struct App {
    listener: TcpListener,
    addr: SocketAddr,
    state: AppState,
    admin_cors: CorsLayer,
}

impl App {
    /// Builds the app with the store selected by `config.database`.
    pub async fn build(config: Settings) -> anyhow::Result<Self> {
        let store = store::from_settings(&config.database)?;
        Self::with_store(config, store).await
    }

    pub async fn with_store(
        config: Settings,
        store: Arc<dyn SubscriberStore>,
    ) -> anyhow::Result<Self> {
        let email = config.email_client;
        let sender = Email::try_from(email.sender_email.as_str())
            .map_err(anyhow::Error::msg)
            .context("The sender email should be valid.")?;
        let timeout = email.timeout();
        let email_client = EmailClient::new(
            email.base_url,
            sender,
            email.authorization_token,
            timeout,
        )
        .context("Could not build the email client.")?;

        let inboxes = Inboxes {
            signups: email
                .notification_recipients
                .into_iter()
                .map(Email::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map_err(anyhow::Error::msg)
                .context("Notification recipients should be valid emails.")?,
            support: Email::try_from(email.support_recipient)
                .map_err(anyhow::Error::msg)
                .context("The support recipient should be a valid email.")?,
        };

        let admin_cors = cors::admin_cors(&config.access.admin_origin)?;
        let access_policy = HostOriginPolicy::from(config.access);

        let listener = TcpListener::bind(format!(
            "{}:{}",
            config.application.host, config.application.port
        ))
        .await
        .context("The listener should be able to bind the address.")?;
        let addr = listener.local_addr()?;

        Ok(Self {
            listener,
            addr,
            state: AppState {
                store,
                email_client,
                inboxes: Arc::new(inboxes),
                access_policy: Arc::new(access_policy),
            },
            admin_cors,
        })
    }

    pub fn host(&self) -> IpAddr {
        self.addr.ip()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    pub async fn serve(self) -> Result<(), io::Error> {
        let app = app_router(self.admin_cors)
            .layer(middleware::from_fn_with_state(
                self.state.clone(),
                gate::guard,
            ))
            .with_state(self.state)
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                    let id = uuid::Uuid::new_v4();
                    tracing::info_span!(
                        "request",
                        method = ?request.method(),
                        uri = ?request.uri(),
                        %id,
                    )
                }),
            );

        axum::serve(self.listener, app.into_make_service()).await
    }
}
