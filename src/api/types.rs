//! Wire types for the backend REST API.
//!
//! Response envelopes carry `success` plus optional `error`/`message`
//! strings; payload fields are lenient (`#[serde(default)]`) because the
//! servers evolve independently of this client. Game objects that are only
//! rendered (character, items, locations, quests) get typed structs; combat
//! state is round-tripped back to the server verbatim and therefore stays
//! raw JSON.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::pet::status::StatusRecord;

/// Speaker of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

// ---------------------------------------------------------------------------
// Pet chat surface
// ---------------------------------------------------------------------------

/// `GET /api/health` body. The only endpoint without the success envelope.
#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub gemini_configured: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scene {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub activities: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ScenesResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub scenes: Vec<Scene>,
}

#[derive(Debug, Deserialize)]
pub struct SceneResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub scene: Option<Scene>,
}

/// One entry of the pet chat context window: the stored role plus the
/// message text under the key the backend expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub message: String,
}

/// `POST /api/chat` request (pet variant). `status` is the flat four-field
/// record; the response returns the container form.
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_scene: Option<String>,
    pub conversation_history: Vec<ContextMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<StatusRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<ChatData>,
}

#[derive(Debug, Deserialize)]
pub struct ChatData {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub scene: Option<String>,
    #[serde(default)]
    pub mcp_command: Option<String>,
    #[serde(default)]
    pub mcp_output: Option<Value>,
    #[serde(default)]
    pub status: Option<StatusPayload>,
}

/// Authoritative status container returned with each pet chat turn.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub values: Option<StatusValues>,
    #[serde(default)]
    pub levels: Option<HashMap<String, String>>,
    #[serde(default)]
    pub overall_condition: Option<String>,
    #[serde(default)]
    pub emoji_hint: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// The four server-side stat values. Fields are individually optional so an
/// incomplete container can be detected and rejected as a whole.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub struct StatusValues {
    #[serde(default)]
    pub hunger: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub happiness: Option<f64>,
    #[serde(default)]
    pub health: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct McpExecuteRequest {
    pub command: String,
}

#[derive(Debug, Deserialize)]
pub struct McpExecuteResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct McpTool {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct McpToolsResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub tools: Vec<McpTool>,
}

// ---------------------------------------------------------------------------
// Adventure auth + character surface
// ---------------------------------------------------------------------------

/// Login and registration share a body; `email` only ever rides along on
/// registration.
#[derive(Debug, Serialize)]
pub struct AuthRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub has_character: bool,
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

/// `GET /api/auth/check` body; note the missing success envelope.
#[derive(Debug, Deserialize)]
pub struct AuthCheckResponse {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonalityTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub stat_bonus: HashMap<String, i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_stats: HashMap<String, i32>,
}

#[derive(Debug, Deserialize)]
pub struct TemplatesResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub personalities: HashMap<String, PersonalityTemplate>,
    #[serde(default)]
    pub classes: HashMap<String, ClassTemplate>,
}

#[derive(Debug, Serialize)]
pub struct CreateCharacterRequest {
    pub name: String,
    pub personality: String,
    pub character_class: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub personality: Option<String>,
    #[serde(default)]
    pub character_class: Option<String>,
    #[serde(default)]
    pub level: i32,
    #[serde(default)]
    pub experience: i32,
    #[serde(default)]
    pub hp: i32,
    #[serde(default)]
    pub max_hp: i32,
    #[serde(default)]
    pub mp: i32,
    #[serde(default)]
    pub max_mp: i32,
    #[serde(default)]
    pub attack: i32,
    #[serde(default)]
    pub defense: i32,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub current_location: String,
    #[serde(default)]
    pub game_stage: Option<String>,
    #[serde(default)]
    pub equipped_weapon: Option<InventoryEntry>,
    #[serde(default)]
    pub equipped_armor: Option<InventoryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CharacterResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub character: Option<Character>,
}

// ---------------------------------------------------------------------------
// Adventure world surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Weapon,
    Armor,
    Consumable,
    Quest,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    pub fn is_equippable(self) -> bool {
        matches!(self, ItemKind::Weapon | ItemKind::Armor)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
            ItemKind::Consumable => "consumable",
            ItemKind::Quest => "quest item",
            ItemKind::Unknown => "item",
        }
    }
}

/// One inventory row: database id + item definition id + the merged item
/// definition fields the server inlines into the row.
#[derive(Debug, Clone, Deserialize)]
pub struct InventoryEntry {
    pub id: i64,
    pub item_id: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default)]
    pub is_equipped: bool,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Option<i64>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub defense_bonus: Option<i32>,
    #[serde(default)]
    pub mp_bonus: Option<i32>,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub heal_amount: Option<i32>,
    #[serde(default)]
    pub mp_amount: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct InventoryResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
}

/// Equip takes the inventory row id, not the item definition id.
#[derive(Debug, Serialize)]
pub struct EquipRequest {
    pub item_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShopItem {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub attack_bonus: Option<i32>,
    #[serde(default)]
    pub defense_bonus: Option<i32>,
    #[serde(default)]
    pub heal_amount: Option<i32>,
    #[serde(default)]
    pub mp_amount: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct ShopItemsResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub items: Vec<ShopItem>,
}

/// Buy takes the item definition id.
#[derive(Debug, Serialize)]
pub struct BuyRequest {
    pub item_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub encounter_rate: Option<f64>,
    #[serde(default)]
    pub shop_available: bool,
    #[serde(default)]
    pub requires_quest: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationsResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub locations: HashMap<String, Location>,
}

#[derive(Debug, Serialize)]
pub struct MoveRequest {
    pub location_id: String,
}

/// Shared envelope for move/equip/buy/logout: a human-readable `message` on
/// success, `message` or `error` on failure, plus the refreshed character
/// when the server sends one.
#[derive(Debug, Deserialize)]
pub struct GameActionResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub location: Option<Location>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExploreKind {
    Combat,
    Safe,
}

#[derive(Debug, Deserialize)]
pub struct ExploreResult {
    #[serde(rename = "type")]
    pub kind: ExploreKind,
    #[serde(default)]
    pub combat_state: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExploreResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub result: Option<ExploreResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatAction {
    Attack,
    Defend,
    Flee,
    UseItem,
}

/// The held combat state goes back to the server verbatim; `item_id` (item
/// definition id) rides along only for `use_item`.
#[derive(Debug, Serialize)]
pub struct CombatActionRequest {
    pub action: CombatAction,
    pub combat_state: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CombatResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub combat_state: Option<Value>,
    #[serde(default)]
    pub character: Option<Character>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestRewards {
    #[serde(default)]
    pub experience: i64,
    #[serde(default)]
    pub gold: i64,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Quest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub rewards: Option<QuestRewards>,
    #[serde(default)]
    pub progress_id: Option<i64>,
    #[serde(default)]
    pub started_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct QuestsResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub quests: Vec<Quest>,
}

/// One entry of the adventure narrator context window. Unlike the pet
/// variant, the backend takes these under their stored field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarratorMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NarratorChatRequest {
    pub message: String,
    pub conversation_history: Vec<NarratorMessage>,
}

/// Fallback body parsed from non-2xx responses when looking for a server
/// supplied error string.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
