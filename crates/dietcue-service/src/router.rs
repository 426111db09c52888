//! Recipient resolution and best-effort delivery.

use std::sync::Arc;

use tracing::{debug, warn};

use dietcue_core::traits::PushTransport;
use dietcue_database::repositories::DeviceRepository;
use dietcue_entity::recipient::{PushToken, RecipientRole};

/// Resolves a logical recipient to a device token and performs the send.
///
/// Delivery is best-effort: every failure mode (missing token, malformed
/// token, directory lookup error, transport error) is logged and reported
/// as `false`, never as an error — scheduling and cancellation state must
/// not depend on whether a send went through.
///
/// The router does not deduplicate sends; the scheduler's claim step is
/// what guarantees one delivery per fire crossing.
#[derive(Debug)]
pub struct DeliveryRouter {
    /// Device/token directory.
    devices: Arc<DeviceRepository>,
    /// External push transport.
    transport: Arc<dyn PushTransport>,
}

impl DeliveryRouter {
    /// Create a new delivery router.
    pub fn new(devices: Arc<DeviceRepository>, transport: Arc<dyn PushTransport>) -> Self {
        Self { devices, transport }
    }

    /// Resolve `role` in the context of `owner_id` and deliver the payload.
    pub async fn resolve_and_deliver(
        &self,
        role: RecipientRole,
        owner_id: &str,
        title: &str,
        body: &str,
        data: serde_json::Value,
    ) -> bool {
        let Some(token) = self.resolve_token(role, owner_id).await else {
            return false;
        };

        match self.transport.send(token.as_str(), title, body, data).await {
            Ok(true) => {
                debug!(owner_id, role = %role, "Delivered notification");
                true
            }
            Ok(false) => {
                warn!(owner_id, role = %role, "Transport reported delivery failure");
                false
            }
            Err(e) => {
                warn!(owner_id, role = %role, error = %e, "Transport call failed");
                false
            }
        }
    }

    /// Resolve a logical recipient to a shape-valid push token.
    async fn resolve_token(&self, role: RecipientRole, owner_id: &str) -> Option<PushToken> {
        let device = match role {
            RecipientRole::Subject => {
                let device = match self.devices.find_by_identity(owner_id).await {
                    Ok(device) => device?,
                    Err(e) => {
                        warn!(owner_id, error = %e, "Directory lookup failed");
                        return None;
                    }
                };
                // Role exclusivity is enforced here, at resolution time:
                // an identity flagged as advisor never receives
                // subject-targeted notifications.
                if device.is_advisor {
                    warn!(owner_id, "Identity is flagged advisor, refusing subject delivery");
                    return None;
                }
                device
            }
            RecipientRole::Advisor => match self.devices.find_advisor().await {
                Ok(Some(device)) => device,
                Ok(None) => {
                    warn!("No advisor registered in the directory");
                    return None;
                }
                Err(e) => {
                    warn!(error = %e, "Advisor lookup failed");
                    return None;
                }
            },
        };

        let token = PushToken::validated(device.push_token);
        if token.is_none() {
            warn!(
                identity = %device.identity,
                role = %role,
                "No usable push token for recipient"
            );
        }
        token
    }
}
