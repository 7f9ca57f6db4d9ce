use serde::{Deserialize, Serialize};

/// CLIP v2 list envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceList<T> {
    #[serde(default)]
    pub errors: Vec<ResourceError>,
    pub data: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResourceError {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SmartScene {
    pub id: String,
    pub metadata: SceneMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneMetadata {
    pub name: String,
}

/// The smart scene considered "home/neutral", resolved once by name and
/// cached for the process lifetime.
#[derive(Debug, Clone)]
pub struct BaselineScene {
    pub id: String,
    pub name: String,
}

impl From<SmartScene> for BaselineScene {
    fn from(scene: SmartScene) -> Self {
        Self {
            id: scene.id,
            name: scene.metadata.name,
        }
    }
}

/// One entry of the whitelist-registration reply.
#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistEntry {
    pub success: WhitelistSuccess,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WhitelistSuccess {
    pub username: String,
}

/// Immediate state pushed to a light group.
#[derive(Debug, Clone, Serialize)]
pub struct GroupAction {
    pub on: bool,
    pub bri: u8,
    pub xy: [f64; 2],
}

/// Body of the virtual link-button press preceding registration.
#[derive(Debug, Clone, Serialize)]
pub struct LinkButtonUpdate {
    pub linkbutton: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub devicetype: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartSceneRecall {
    pub auto_dynamic: bool,
    pub recall: SmartSceneRecallAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct SmartSceneRecallAction {
    pub action: &'static str,
}
