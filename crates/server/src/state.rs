use std::sync::Arc;

use oscar_core::{
    Authenticator, Campus, ChatClient, Config, EnrollmentService, Notifier, SanitizedConfig,
    TicketGateway,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    enrollment: Option<Arc<EnrollmentService>>,
    notifier: Arc<dyn Notifier>,
    tickets: Option<Arc<dyn TicketGateway>>,
    chat: Option<Arc<ChatClient>>,
    campus: Arc<Campus>,
}

impl AppState {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        enrollment: Option<Arc<EnrollmentService>>,
        notifier: Arc<dyn Notifier>,
        tickets: Option<Arc<dyn TicketGateway>>,
        chat: Option<Arc<ChatClient>>,
        campus: Arc<Campus>,
    ) -> Self {
        Self {
            config,
            authenticator,
            enrollment,
            notifier,
            tickets,
            chat,
            campus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    /// The enrollment workflow, when a roster is configured.
    pub fn enrollment(&self) -> Option<&Arc<EnrollmentService>> {
        self.enrollment.as_ref()
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// The ticket gateway, when a chat platform is configured.
    pub fn tickets(&self) -> Option<&Arc<dyn TicketGateway>> {
        self.tickets.as_ref()
    }

    /// The chat client, when a chat platform is configured.
    pub fn chat(&self) -> Option<&Arc<ChatClient>> {
        self.chat.as_ref()
    }

    pub fn campus(&self) -> &Campus {
        &self.campus
    }

    /// Post a line to the operations log channel, if available.
    pub async fn post_log(&self, message: &str) {
        if let Some(chat) = &self.chat {
            chat.post_log(message).await;
        }
    }
}
