//! Serde fixtures for the backend's JSON shapes.
//!
//! Each fixture is a verbatim body the way the servers write it, including
//! the quirks: the health and auth-check endpoints skip the success
//! envelope, item rows inline their definition fields, and rule refusals
//! come back with `success: false` inside a 200.

use petshell::api::types::{
    AuthCheckResponse, CharacterResponse, ChatRequest, ChatResponse, CombatAction,
    CombatActionRequest, ContextMessage, ExploreKind, ExploreResponse, GameActionResponse,
    HealthResponse, InventoryResponse, ItemKind, LocationsResponse, McpToolsResponse,
    QuestsResponse, Role, ScenesResponse, TemplatesResponse,
};
use petshell::pet::StatusRecord;
use serde_json::json;

#[test]
fn health_has_no_success_envelope() {
    let body = r#"{"status": "ok", "gemini_configured": false}"#;
    let health: HealthResponse = serde_json::from_str(body).unwrap();
    assert_eq!(health.status, "ok");
    assert!(!health.gemini_configured);
}

#[test]
fn scene_list_with_activities() {
    let body = r#"{
        "success": true,
        "scenes": [
            {"id": "bedroom", "name": "温馨卧室", "name_en": "Cozy Bedroom",
             "description": "柔软的小窝", "icon": "🛏️",
             "activities": ["睡觉", "打滚"]},
            {"id": "kitchen", "name": "阳光厨房"}
        ]
    }"#;
    let scenes: ScenesResponse = serde_json::from_str(body).unwrap();
    assert!(scenes.success);
    assert_eq!(scenes.scenes.len(), 2);
    assert_eq!(scenes.scenes[0].activities, vec!["睡觉", "打滚"]);
    assert!(scenes.scenes[1].description.is_none());
    assert!(scenes.scenes[1].activities.is_empty());
}

#[test]
fn chat_reply_with_status_container() {
    let body = r#"{
        "success": true,
        "data": {
            "message": "喵呜~ 好饿呀",
            "emoji": "😿",
            "scene": "kitchen",
            "mcp_command": null,
            "mcp_output": null,
            "status": {
                "values": {"hunger": 64.0, "energy": 71.5, "happiness": 58.0, "health": 88.0},
                "levels": {"hunger": "medium", "energy": "high"},
                "overall_condition": "good",
                "emoji_hint": "😿",
                "message": "有点饿了"
            }
        }
    }"#;
    let reply: ChatResponse = serde_json::from_str(body).unwrap();
    let data = reply.data.unwrap();
    assert_eq!(data.message, "喵呜~ 好饿呀");
    assert_eq!(data.scene.as_deref(), Some("kitchen"));
    let values = data.status.unwrap().values.unwrap();
    assert_eq!(values.hunger, Some(64.0));
    assert_eq!(values.energy, Some(71.5));
}

#[test]
fn chat_reply_without_status_container() {
    let body = r#"{"success": true, "data": {"message": "呼噜噜", "emoji": "😸"}}"#;
    let reply: ChatResponse = serde_json::from_str(body).unwrap();
    let data = reply.data.unwrap();
    assert_eq!(data.emoji.as_deref(), Some("😸"));
    assert!(data.status.is_none());
}

#[test]
fn chat_request_sends_flat_status_and_role_message_pairs() {
    let request = ChatRequest {
        message: "该吃饭了吗".to_string(),
        current_scene: Some("kitchen".to_string()),
        conversation_history: vec![
            ContextMessage {
                role: Role::User,
                message: "你好".to_string(),
            },
            ContextMessage {
                role: Role::Assistant,
                message: "喵~".to_string(),
            },
        ],
        status: Some(StatusRecord::default()),
    };
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["current_scene"], "kitchen");
    assert_eq!(body["conversation_history"][0]["role"], "user");
    assert_eq!(body["conversation_history"][0]["message"], "你好");
    assert_eq!(body["conversation_history"][1]["role"], "assistant");
    assert_eq!(body["status"]["hunger"], 80);
    assert_eq!(body["status"]["health"], 90);
}

#[test]
fn chat_request_omits_absent_scene_and_status() {
    let request = ChatRequest {
        message: "hi".to_string(),
        current_scene: None,
        conversation_history: Vec::new(),
        status: None,
    };
    let body = serde_json::to_value(&request).unwrap();
    assert!(body.get("current_scene").is_none());
    assert!(body.get("status").is_none());
    assert_eq!(body["conversation_history"], json!([]));
}

#[test]
fn tool_list_with_parameters() {
    let body = r#"{
        "success": true,
        "tools": [
            {"name": "time", "description": "查询当前时间", "parameters": []},
            {"name": "weather", "description": "查询天气", "parameters": ["city"]}
        ]
    }"#;
    let tools: McpToolsResponse = serde_json::from_str(body).unwrap();
    assert_eq!(tools.tools.len(), 2);
    assert_eq!(tools.tools[1].parameters, vec!["city"]);
}

#[test]
fn auth_check_is_bare() {
    let body = r#"{"authenticated": false}"#;
    let check: AuthCheckResponse = serde_json::from_str(body).unwrap();
    assert!(!check.authenticated);
    assert!(check.user.is_none());

    let body = r#"{"authenticated": true,
                   "user": {"id": 3, "username": "alice", "has_character": true}}"#;
    let check: AuthCheckResponse = serde_json::from_str(body).unwrap();
    assert!(check.authenticated);
    assert_eq!(check.user.unwrap().username, "alice");
}

#[test]
fn character_with_an_equipped_weapon_row() {
    let body = r#"{
        "success": true,
        "character": {
            "id": 1, "name": "小勇", "personality": "brave", "character_class": "warrior",
            "level": 3, "experience": 120,
            "hp": 95, "max_hp": 120, "mp": 30, "max_mp": 50,
            "attack": 18, "defense": 9, "gold": 250,
            "current_location": "village", "game_stage": "explore",
            "equipped_weapon": {
                "id": 7, "item_id": "iron_sword", "quantity": 1, "is_equipped": true,
                "name": "铁剑", "type": "weapon", "description": "可靠的铁剑",
                "price": 100, "icon": "⚔️", "attack_bonus": 5
            },
            "equipped_armor": null
        }
    }"#;
    let response: CharacterResponse = serde_json::from_str(body).unwrap();
    let character = response.character.unwrap();
    assert_eq!(character.gold, 250);
    let weapon = character.equipped_weapon.unwrap();
    assert_eq!(weapon.id, 7);
    assert_eq!(weapon.item_id, "iron_sword");
    assert_eq!(weapon.kind, ItemKind::Weapon);
    assert_eq!(weapon.attack_bonus, Some(5));
    assert!(character.equipped_armor.is_none());
}

#[test]
fn template_maps_are_keyed_by_id() {
    let body = r#"{
        "success": true,
        "personalities": {
            "brave": {"id": "brave", "name": "勇敢", "name_en": "Brave",
                      "description": "无所畏惧", "stat_bonus": {"attack": 2}}
        },
        "classes": {
            "warrior": {"id": "warrior", "name": "战士", "name_en": "Warrior",
                        "description": "近战专家",
                        "base_stats": {"hp": 120, "mp": 30, "attack": 15, "defense": 10}}
        }
    }"#;
    let templates: TemplatesResponse = serde_json::from_str(body).unwrap();
    assert_eq!(templates.personalities["brave"].stat_bonus["attack"], 2);
    assert_eq!(templates.classes["warrior"].base_stats["hp"], 120);
}

#[test]
fn inventory_rows_inline_their_definitions() {
    let body = r#"{
        "success": true,
        "inventory": [
            {"id": 12, "item_id": "healing_potion", "quantity": 3, "is_equipped": false,
             "name": "治疗药水", "type": "consumable", "description": "恢复生命",
             "price": 20, "icon": "🧪", "effect": "heal", "heal_amount": 30},
            {"id": 13, "item_id": "mystery_box", "quantity": 1, "is_equipped": false,
             "name": "神秘盒子", "type": "artifact"}
        ]
    }"#;
    let inventory: InventoryResponse = serde_json::from_str(body).unwrap();
    let rows = &inventory.inventory;
    assert_eq!(rows[0].kind, ItemKind::Consumable);
    assert_eq!(rows[0].heal_amount, Some(30));
    assert!(!rows[0].kind.is_equippable());
    // Unrecognized type strings degrade instead of failing the whole list.
    assert_eq!(rows[1].kind, ItemKind::Unknown);
}

#[test]
fn locations_come_as_a_map() {
    let body = r#"{
        "success": true,
        "locations": {
            "village": {"id": "village", "name": "新手村", "description": "安全的起点",
                        "icon": "🏘️", "encounter_rate": 0.0, "shop_available": true},
            "dark_cave": {"id": "dark_cave", "name": "黑暗洞穴", "description": "危险",
                          "encounter_rate": 0.8, "shop_available": false,
                          "requires_quest": "find_the_map"}
        }
    }"#;
    let locations: LocationsResponse = serde_json::from_str(body).unwrap();
    assert!(locations.locations["village"].shop_available);
    assert_eq!(
        locations.locations["dark_cave"].requires_quest.as_deref(),
        Some("find_the_map")
    );
}

#[test]
fn rule_refusal_is_a_successful_decode() {
    let body = r#"{"success": false, "message": "金币不足"}"#;
    let refusal: GameActionResponse = serde_json::from_str(body).unwrap();
    assert!(!refusal.success);
    assert_eq!(refusal.message.as_deref(), Some("金币不足"));
    assert!(refusal.error.is_none());
    assert!(refusal.character.is_none());
}

#[test]
fn explore_splits_into_combat_and_safe() {
    let body = r#"{
        "success": true,
        "result": {
            "type": "combat",
            "combat_state": {"active": true, "turn": 1,
                             "enemy": {"name": "史莱姆", "hp": 30, "max_hp": 30},
                             "character": {"hp": 95, "max_hp": 120, "mp": 30, "max_mp": 50},
                             "log": ["一只史莱姆跳了出来!"]}
        }
    }"#;
    let explore: ExploreResponse = serde_json::from_str(body).unwrap();
    let result = explore.result.unwrap();
    assert_eq!(result.kind, ExploreKind::Combat);
    let state = result.combat_state.unwrap();
    assert_eq!(state["enemy"]["name"], "史莱姆");

    let body = r#"{"success": true,
                   "result": {"type": "safe", "message": "你发现了一片安静的空地"}}"#;
    let explore: ExploreResponse = serde_json::from_str(body).unwrap();
    let result = explore.result.unwrap();
    assert_eq!(result.kind, ExploreKind::Safe);
    assert!(result.combat_state.is_none());
}

#[test]
fn combat_request_round_trips_state_and_names_the_item() {
    let held_state = json!({"active": true, "turn": 2, "enemy": {"name": "史莱姆", "hp": 12}});
    let request = CombatActionRequest {
        action: CombatAction::UseItem,
        combat_state: held_state.clone(),
        item_id: Some("healing_potion".to_string()),
    };
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["action"], "use_item");
    assert_eq!(body["combat_state"], held_state);
    assert_eq!(body["item_id"], "healing_potion");

    let request = CombatActionRequest {
        action: CombatAction::Attack,
        combat_state: held_state,
        item_id: None,
    };
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(body["action"], "attack");
    assert!(body.get("item_id").is_none());
}

#[test]
fn quests_with_rewards_and_progress() {
    let body = r#"{
        "success": true,
        "quests": [
            {"id": "first_steps", "name": "初出茅庐", "description": "熟悉村庄",
             "objectives": ["和村长对话", "购买一件装备"],
             "rewards": {"experience": 50, "gold": 30, "items": ["healing_potion"]},
             "progress_id": 4, "started_at": "2024-03-01T09:30:00"}
        ]
    }"#;
    let quests: QuestsResponse = serde_json::from_str(body).unwrap();
    let quest = &quests.quests[0];
    assert_eq!(quest.objectives.len(), 2);
    let rewards = quest.rewards.as_ref().unwrap();
    assert_eq!(rewards.experience, 50);
    assert_eq!(rewards.items, vec!["healing_potion"]);
    assert_eq!(quest.progress_id, Some(4));
}
