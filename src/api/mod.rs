//! Async HTTP client shared by the pet and adventure front-ends.
//!
//! One [`ApiClient`] instance talks to one backend. The adventure server
//! authenticates with a session cookie, so the underlying `reqwest` client
//! keeps a cookie store and must live as long as the login does.

pub mod types;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::pet::status::StatusRecord;
use types::*;

/// Errors surfaced by backend calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport level failure (connection refused, timeout, bad JSON).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered but reported a failure of its own.
    #[error("{0}")]
    Backend(String),
}

fn backend_error(error: Option<String>, message: Option<String>, fallback: &str) -> ApiError {
    ApiError::Backend(error.or(message).unwrap_or_else(|| fallback.to_string()))
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url`. A trailing slash on the URL is
    /// tolerated so config values like `http://localhost:5000/` work.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::decode(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::decode(response).await
    }

    /// Non-2xx responses usually still carry a JSON body with an `error` or
    /// `message` string; surface that text when it is there.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(backend_error(
                body.error,
                body.message,
                &format!("server returned {status}"),
            ));
        }
        Ok(response.json().await?)
    }

    // -- pet backend --------------------------------------------------------

    pub async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("/api/health").await
    }

    pub async fn scenes(&self) -> Result<Vec<Scene>, ApiError> {
        let body: ScenesResponse = self.get_json("/api/scenes").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "scene list unavailable"));
        }
        Ok(body.scenes)
    }

    pub async fn scene(&self, scene_id: &str) -> Result<Scene, ApiError> {
        let path = format!("/api/scene/{}", urlencoding::encode(scene_id));
        let body: SceneResponse = self.get_json(&path).await?;
        if !body.success {
            return Err(backend_error(body.error, None, "scene unavailable"));
        }
        body.scene
            .ok_or_else(|| ApiError::Backend("scene missing from response".to_string()))
    }

    /// One pet chat turn. The reply `data` carries the assistant text plus
    /// the optional emoji, scene suggestion, tool output and status block.
    pub async fn chat(
        &self,
        message: &str,
        current_scene: Option<&str>,
        conversation_history: Vec<ContextMessage>,
        status: Option<StatusRecord>,
    ) -> Result<ChatData, ApiError> {
        let request = ChatRequest {
            message: message.to_string(),
            current_scene: current_scene.map(str::to_string),
            conversation_history,
            status,
        };
        let body: ChatResponse = self.post_json("/api/chat", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, None, "chat failed"));
        }
        body.data
            .ok_or_else(|| ApiError::Backend("empty chat response".to_string()))
    }

    pub async fn mcp_tools(&self) -> Result<Vec<McpTool>, ApiError> {
        let body: McpToolsResponse = self.get_json("/api/mcp/tools").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "tool list unavailable"));
        }
        Ok(body.tools)
    }

    pub async fn mcp_execute(&self, command: &str) -> Result<Value, ApiError> {
        let request = McpExecuteRequest {
            command: command.to_string(),
        };
        let body: McpExecuteResponse = self.post_json("/api/mcp/execute", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, None, "command failed"));
        }
        Ok(body.result.unwrap_or(Value::Null))
    }

    // -- adventure backend: auth and character ------------------------------

    /// Create an account. The server does not log the new account in; a
    /// login call must follow.
    pub async fn register(
        &self,
        username: &str,
        password: &str,
        email: Option<&str>,
    ) -> Result<(), ApiError> {
        let request = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::to_string),
        };
        let body: AuthResponse = self.post_json("/api/auth/register", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, body.message, "registration failed"));
        }
        Ok(())
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthUser, ApiError> {
        let request = AuthRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: None,
        };
        let body: AuthResponse = self.post_json("/api/auth/login", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, body.message, "login failed"));
        }
        body.user
            .ok_or_else(|| ApiError::Backend("user missing from response".to_string()))
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        let body: GameActionResponse = self
            .post_json("/api/auth/logout", &Value::Object(Default::default()))
            .await?;
        if !body.success {
            return Err(backend_error(body.error, body.message, "logout failed"));
        }
        Ok(())
    }

    pub async fn auth_check(&self) -> Result<AuthCheckResponse, ApiError> {
        self.get_json("/api/auth/check").await
    }

    pub async fn character_templates(&self) -> Result<TemplatesResponse, ApiError> {
        let body: TemplatesResponse = self.get_json("/api/character/templates").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "templates unavailable"));
        }
        Ok(body)
    }

    pub async fn create_character(
        &self,
        name: &str,
        personality: &str,
        character_class: &str,
    ) -> Result<Character, ApiError> {
        let request = CreateCharacterRequest {
            name: name.to_string(),
            personality: personality.to_string(),
            character_class: character_class.to_string(),
        };
        let body: CharacterResponse = self.post_json("/api/character/create", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, body.message, "creation failed"));
        }
        body.character
            .ok_or_else(|| ApiError::Backend("character missing from response".to_string()))
    }

    /// Fetch the logged-in user's character. `Ok(None)` means the account
    /// has no character yet.
    pub async fn character(&self) -> Result<Option<Character>, ApiError> {
        let response = self.http.get(self.url("/api/character")).send().await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body: CharacterResponse = Self::decode(response).await?;
        if !body.success {
            return Err(backend_error(body.error, body.message, "character unavailable"));
        }
        Ok(body.character)
    }

    // -- adventure backend: world ------------------------------------------

    pub async fn locations(&self) -> Result<std::collections::HashMap<String, Location>, ApiError> {
        let body: LocationsResponse = self.get_json("/api/game/locations").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "locations unavailable"));
        }
        Ok(body.locations)
    }

    /// Travel to another location. Rule refusals ("you cannot go there
    /// yet") come back as `success: false` with a message and are part of
    /// normal play, so the whole envelope is returned.
    pub async fn move_to(&self, location_id: &str) -> Result<GameActionResponse, ApiError> {
        let request = MoveRequest {
            location_id: location_id.to_string(),
        };
        self.post_json("/api/game/move", &request).await
    }

    pub async fn explore(&self) -> Result<ExploreResult, ApiError> {
        let body: ExploreResponse = self
            .post_json("/api/game/explore", &Value::Object(Default::default()))
            .await?;
        if !body.success {
            return Err(backend_error(body.error, None, "explore failed"));
        }
        body.result
            .ok_or_else(|| ApiError::Backend("empty explore response".to_string()))
    }

    pub async fn combat_action(
        &self,
        action: CombatAction,
        combat_state: Value,
        item_id: Option<String>,
    ) -> Result<CombatResponse, ApiError> {
        let request = CombatActionRequest {
            action,
            combat_state,
            item_id,
        };
        let body: CombatResponse = self.post_json("/api/combat/action", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, None, "combat action failed"));
        }
        Ok(body)
    }

    pub async fn inventory(&self) -> Result<Vec<InventoryEntry>, ApiError> {
        let body: InventoryResponse = self.get_json("/api/inventory").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "inventory unavailable"));
        }
        Ok(body.inventory)
    }

    /// Equip an inventory row. Refusals (wrong item type) are `success:
    /// false` outcomes, so the envelope is returned whole.
    pub async fn equip(&self, inventory_id: i64) -> Result<GameActionResponse, ApiError> {
        let request = EquipRequest {
            item_id: inventory_id,
        };
        self.post_json("/api/inventory/equip", &request).await
    }

    pub async fn shop_items(&self) -> Result<Vec<ShopItem>, ApiError> {
        let body: ShopItemsResponse = self.get_json("/api/shop/items").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "shop unavailable"));
        }
        Ok(body.items)
    }

    /// Buy from the shop. Refusals (not enough gold, no shop here) are
    /// `success: false` outcomes.
    pub async fn buy(&self, item_id: &str, quantity: i32) -> Result<GameActionResponse, ApiError> {
        let request = BuyRequest {
            item_id: item_id.to_string(),
            quantity,
        };
        self.post_json("/api/shop/buy", &request).await
    }

    pub async fn quests(&self) -> Result<Vec<Quest>, ApiError> {
        let body: QuestsResponse = self.get_json("/api/quests").await?;
        if !body.success {
            return Err(backend_error(body.error, None, "quests unavailable"));
        }
        Ok(body.quests)
    }

    /// Free-form talk with the adventure narrator. Shares the `/api/chat`
    /// envelope with the pet backend but never carries client state.
    pub async fn narrator_chat(
        &self,
        message: &str,
        conversation_history: Vec<NarratorMessage>,
    ) -> Result<ChatData, ApiError> {
        let request = NarratorChatRequest {
            message: message.to_string(),
            conversation_history,
        };
        let body: ChatResponse = self.post_json("/api/chat", &request).await?;
        if !body.success {
            return Err(backend_error(body.error, None, "chat failed"));
        }
        body.data
            .ok_or_else(|| ApiError::Backend("empty chat response".to_string()))
    }
}
