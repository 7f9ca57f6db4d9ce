use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{Mutex, RwLock};

use crate::configs::Hue;
use crate::errors::LightingError;
use crate::models::{
    AlertLevel, BaselineScene, GroupAction, LinkButtonUpdate, Registration, ResourceList,
    SmartScene, SmartSceneRecall, SmartSceneRecallAction, WhitelistEntry,
};
use crate::services::TokenService;

/// How long the alert color stays on the group before the baseline returns.
const ALERT_DWELL: Duration = Duration::from_secs(15);
/// Pause before the single restore retry.
const RESTORE_RETRY_COOLDOWN: Duration = Duration::from_secs(5);
const FULL_BRIGHTNESS: u8 = 255;

/// Drives the light group through an alert: push the alert color, hold it for
/// the dwell, then recall the baseline scene. The application key and the
/// baseline scene are resolved lazily and cached for the process lifetime.
pub struct LightingService {
    token: Arc<TokenService>,
    client: Client,
    api_url: String,
    group_id: String,
    baseline_scene_name: String,
    device_type: String,
    application_key: RwLock<Option<String>>,
    baseline_scene: RwLock<Option<BaselineScene>>,
    // Single-flight guard: a sequence arriving mid-sequence is dropped.
    sequence: Mutex<()>,
}

impl LightingService {
    pub fn new(settings: &Hue, token: Arc<TokenService>) -> Self {
        Self {
            token,
            client: Client::new(),
            api_url: settings.api_url.clone(),
            group_id: settings.group_id.clone(),
            baseline_scene_name: settings.baseline_scene.clone(),
            device_type: settings.device_type.clone(),
            application_key: RwLock::new(None),
            baseline_scene: RwLock::new(None),
            sequence: Mutex::new(()),
        }
    }

    /// Run one full alert: resolve the baseline first (a color with no known
    /// way back is never pushed), set the group appearance, hold, restore.
    /// A second invocation while one is in flight is dropped, not queued; the
    /// policy debounce keeps triggers rarer than the sequence duration, so
    /// this is a safety net, not the primary defense.
    pub async fn run_alert_sequence(&self, level: AlertLevel) {
        let Ok(_guard) = self.sequence.try_lock() else {
            tracing::debug!("alert sequence already in flight, dropping {}", level);
            return;
        };

        let scene = match self.resolve_baseline_scene().await {
            Ok(scene) => scene,
            Err(e) => {
                tracing::warn!("aborting alert sequence: {}", e);
                return;
            }
        };

        tracing::info!("showing {} alert on group {}", level, self.group_id);
        if let Err(e) = self.set_group_appearance(level).await {
            tracing::warn!("failed to set alert color: {}", e);
        }

        tokio::time::sleep(ALERT_DWELL).await;

        if let Err(e) = self.restore_baseline(&scene).await {
            tracing::warn!("baseline not restored, group stays {}: {}", level, e);
        }
    }

    /// The smart scene matching the configured baseline name, cached after
    /// the first successful lookup. Absence is a configuration problem; the
    /// cache stays empty so the next alert retries the lookup.
    pub async fn resolve_baseline_scene(&self) -> Result<BaselineScene, LightingError> {
        if let Some(scene) = self.baseline_scene.read().await.clone() {
            return Ok(scene);
        }

        let application_key = self.ensure_registered().await?;
        let bearer = self.token.bearer().await.ok_or(LightingError::NotAuthorized)?;

        let response = self
            .client
            .get(format!("{}/route/clip/v2/resource/smart_scene", self.api_url))
            .bearer_auth(&bearer)
            .header("hue-application-key", &application_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LightingError::SceneList { status });
        }

        let scenes: ResourceList<SmartScene> = response.json().await?;
        let scene = scenes
            .data
            .into_iter()
            .find(|scene| scene.metadata.name == self.baseline_scene_name)
            .map(BaselineScene::from)
            .ok_or_else(|| LightingError::BaselineSceneMissing {
                name: self.baseline_scene_name.clone(),
            })?;

        tracing::info!("loaded baseline scene '{}' ({})", scene.name, scene.id);
        *self.baseline_scene.write().await = Some(scene.clone());

        Ok(scene)
    }

    /// Push an immediate group state: on, full brightness, the level's color.
    pub async fn set_group_appearance(&self, level: AlertLevel) -> Result<(), LightingError> {
        let application_key = self.ensure_registered().await?;
        let bearer = self.token.bearer().await.ok_or(LightingError::NotAuthorized)?;

        let response = self
            .client
            .put(format!(
                "{}/route/api/{}/groups/{}/action",
                self.api_url, application_key, self.group_id
            ))
            .bearer_auth(&bearer)
            .json(&GroupAction {
                on: true,
                bri: FULL_BRIGHTNESS,
                xy: level.color_point(),
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LightingError::GroupCommand { status });
        }

        Ok(())
    }

    /// Recall the baseline scene, retrying exactly once after a cooldown.
    /// A second failure leaves the room in the alert color until the next
    /// successful cycle; pretending success would mask the degraded state.
    pub async fn restore_baseline(&self, scene: &BaselineScene) -> Result<(), LightingError> {
        match self.recall_scene(scene).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::info!("baseline restore failed, retrying after cooldown: {}", e);
                tokio::time::sleep(RESTORE_RETRY_COOLDOWN).await;
                self.recall_scene(scene).await
            }
        }
    }

    async fn recall_scene(&self, scene: &BaselineScene) -> Result<(), LightingError> {
        let application_key = self.ensure_registered().await?;
        let bearer = self.token.bearer().await.ok_or(LightingError::NotAuthorized)?;

        let response = self
            .client
            .put(format!(
                "{}/route/clip/v2/resource/smart_scene/{}",
                self.api_url, scene.id
            ))
            .bearer_auth(&bearer)
            .header("hue-application-key", &application_key)
            .json(&SmartSceneRecall {
                auto_dynamic: true,
                recall: SmartSceneRecallAction {
                    action: "activate",
                },
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LightingError::SceneRecall { status });
        }

        Ok(())
    }

    /// One-time device registration (press-link-button style), cached as the
    /// application key. Repeating the registration against the vendor is
    /// safe, so a failed attempt is simply retried on the next call.
    async fn ensure_registered(&self) -> Result<String, LightingError> {
        if let Some(key) = self.application_key.read().await.clone() {
            return Ok(key);
        }

        let bearer = self.token.bearer().await.ok_or(LightingError::NotAuthorized)?;

        let response = self
            .client
            .put(format!("{}/route/api/0/config", self.api_url))
            .bearer_auth(&bearer)
            .json(&LinkButtonUpdate { linkbutton: true })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LightingError::Registration { status });
        }

        let response = self
            .client
            .post(format!("{}/route/api/", self.api_url))
            .bearer_auth(&bearer)
            .json(&Registration {
                devicetype: self.device_type.clone(),
            })
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            return Err(LightingError::Registration { status });
        }

        let entries: Vec<WhitelistEntry> = response.json().await?;
        let username = entries
            .into_iter()
            .next()
            .map(|entry| entry.success.username)
            .ok_or(LightingError::Malformed)?;

        tracing::info!("registered lighting application key");
        *self.application_key.write().await = Some(username.clone());

        Ok(username)
    }
}
