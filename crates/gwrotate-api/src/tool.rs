// /tool endpoints

use tracing::debug;

use crate::client::RouterOsClient;
use crate::error::Error;
use crate::models::EmailMessage;

impl RouterOsClient {
    /// Send an e-mail through the router's configured SMTP server.
    ///
    /// `POST /rest/tool/e-mail/send`
    pub async fn send_email(&self, message: &EmailMessage) -> Result<(), Error> {
        debug!(to = %message.to, subject = %message.subject, "sending e-mail");
        let _: serde_json::Value = self.command("tool/e-mail/send", message).await?;
        Ok(())
    }
}
