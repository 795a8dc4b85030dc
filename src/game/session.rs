//! Interactive adventure loop.
//!
//! Drives the RPG backend: cookie-session auth, character creation from
//! server templates, world commands, and a combat mode that round-trips
//! the server's combat state verbatim. Rule refusals and transport errors
//! both print and leave local state untouched.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::api::types::{
    AuthUser, Character, ClassTemplate, CombatAction, ExploreKind, InventoryEntry, ItemKind,
    Location, NarratorMessage, PersonalityTemplate, Quest, Role, ShopItem,
};
use crate::api::{ApiClient, ApiError};
use crate::config::Config;

/// How many narrator transcript entries ride along as context.
const CONTEXT_WINDOW: usize = 10;

/// How many combat log lines are replayed after each action.
const LOG_TAIL: usize = 4;

type InputLines = Lines<BufReader<Stdin>>;

pub struct GameSession {
    api: ApiClient,
    character: Character,
    locations: HashMap<String, Location>,
    inventory: Vec<InventoryEntry>,
    shop_items: Vec<ShopItem>,
    quests: Vec<Quest>,
    chat_log: Vec<NarratorMessage>,
    combat: Option<Value>,
}

pub async fn run(config: &Config) -> Result<()> {
    let api = ApiClient::new(&config.server.base_url)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let Some(user) = authenticate(&api, &mut lines).await? else {
        return Ok(());
    };
    println!("welcome, {}", user.username);

    let Some(character) = ensure_character(&api, &mut lines).await? else {
        return Ok(());
    };
    println!(
        "{}, level {} {}",
        character.name,
        character.level,
        character.character_class.as_deref().unwrap_or("adventurer")
    );

    let locations = match api.locations().await {
        Ok(map) => map,
        Err(e) => {
            println!("note: locations unavailable ({e})");
            HashMap::new()
        }
    };
    let inventory = match api.inventory().await {
        Ok(items) => items,
        Err(e) => {
            println!("note: inventory unavailable ({e})");
            Vec::new()
        }
    };
    let shop_items = match api.shop_items().await {
        Ok(items) => items,
        Err(e) => {
            println!("note: shop unavailable ({e})");
            Vec::new()
        }
    };
    let quests = match api.quests().await {
        Ok(quests) => quests,
        Err(e) => {
            println!("note: quests unavailable ({e})");
            Vec::new()
        }
    };

    let mut session = GameSession {
        api,
        character,
        locations,
        inventory,
        shop_items,
        quests,
        chat_log: Vec::new(),
        combat: None,
    };
    session.look();
    println!("(type help for commands)");

    loop {
        let prompt = if session.combat.is_some() {
            "combat> "
        } else {
            "> "
        };
        print!("{prompt}");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if session.combat.is_some() {
            session.handle_combat_command(&line).await;
        } else if session.handle_command(&line).await? {
            break;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Auth and character creation
// ---------------------------------------------------------------------------

/// Log in, offering registration when the account is unknown. `None` means
/// the user bailed out (end of input).
async fn authenticate(api: &ApiClient, lines: &mut InputLines) -> Result<Option<AuthUser>> {
    match api.auth_check().await {
        Ok(check) if check.authenticated => {
            if let Some(user) = check.user {
                println!("already logged in as {}", user.username);
                return Ok(Some(user));
            }
        }
        Ok(_) => {}
        Err(e) => println!("note: backend not reachable ({e})"),
    }

    loop {
        let Some(username) = prompt_line(lines, "username: ").await? else {
            return Ok(None);
        };
        if username.is_empty() {
            continue;
        }
        let password = rpassword::prompt_password("password: ")?;

        match api.login(&username, &password).await {
            Ok(user) => return Ok(Some(user)),
            Err(ApiError::Backend(message)) => {
                println!("login failed: {message}");
                if !confirm(lines, "create this account? [y/N] ").await? {
                    continue;
                }
                let Some(email) = prompt_line(lines, "email (optional): ").await? else {
                    return Ok(None);
                };
                let email = (!email.is_empty()).then_some(email);
                match api.register(&username, &password, email.as_deref()).await {
                    Ok(()) => match api.login(&username, &password).await {
                        Ok(user) => return Ok(Some(user)),
                        Err(e) => println!("login failed: {e}"),
                    },
                    Err(e) => println!("registration failed: {e}"),
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }
}

/// Fetch the character, running creation when the account has none. `None`
/// means the session cannot start.
async fn ensure_character(api: &ApiClient, lines: &mut InputLines) -> Result<Option<Character>> {
    match api.character().await {
        Ok(Some(character)) => Ok(Some(character)),
        Ok(None) => create_character(api, lines).await,
        Err(e) => {
            println!("error: {e}");
            Ok(None)
        }
    }
}

async fn create_character(api: &ApiClient, lines: &mut InputLines) -> Result<Option<Character>> {
    let templates = match api.character_templates().await {
        Ok(templates) => templates,
        Err(e) => {
            println!("error: {e}");
            return Ok(None);
        }
    };

    println!("no character yet, let's make one");
    let name = loop {
        let Some(name) = prompt_line(lines, "name: ").await? else {
            return Ok(None);
        };
        if !name.is_empty() {
            break name;
        }
    };

    let mut personalities: Vec<&PersonalityTemplate> = templates.personalities.values().collect();
    personalities.sort_by(|a, b| a.id.cmp(&b.id));
    println!("personalities:");
    for p in &personalities {
        println!(
            "  {:<10} {:<12} {}",
            p.id,
            bilingual(&p.name, p.name_en.as_deref()),
            p.description
        );
    }
    let personality = loop {
        let Some(choice) = prompt_line(lines, "personality: ").await? else {
            return Ok(None);
        };
        if templates.personalities.contains_key(&choice) {
            break choice;
        }
        println!("pick one of the listed ids");
    };

    let mut classes: Vec<&ClassTemplate> = templates.classes.values().collect();
    classes.sort_by(|a, b| a.id.cmp(&b.id));
    println!("classes:");
    for c in &classes {
        println!(
            "  {:<10} {:<12} {} ({})",
            c.id,
            bilingual(&c.name, c.name_en.as_deref()),
            c.description,
            stat_summary(&c.base_stats)
        );
    }
    let class = loop {
        let Some(choice) = prompt_line(lines, "class: ").await? else {
            return Ok(None);
        };
        if templates.classes.contains_key(&choice) {
            break choice;
        }
        println!("pick one of the listed ids");
    };

    match api.create_character(&name, &personality, &class).await {
        Ok(character) => Ok(Some(character)),
        Err(e) => {
            println!("error: {e}");
            Ok(None)
        }
    }
}

// ---------------------------------------------------------------------------
// World commands
// ---------------------------------------------------------------------------

impl GameSession {
    /// Returns `true` when the session should end.
    async fn handle_command(&mut self, line: &str) -> Result<bool> {
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "look" => self.look(),
            "stats" => self.show_stats(),
            "inv" | "inventory" => self.show_inventory(),
            "equip" => self.equip(arg).await,
            "use" => println!("items can only be used in combat"),
            "shop" => self.show_shop().await,
            "buy" => self.buy(arg).await,
            "map" => self.show_map(),
            "go" => self.travel(arg).await,
            "explore" => self.explore().await,
            "quests" => self.show_quests(),
            "say" => self.narrate(arg).await,
            "logout" => {
                match self.api.logout().await {
                    Ok(()) => println!("logged out"),
                    Err(e) => println!("error: {e}"),
                }
                return Ok(true);
            }
            "help" => print_help(),
            "quit" | "exit" => return Ok(true),
            other => println!("unknown command: {other} (see help)"),
        }
        Ok(false)
    }

    fn current_location(&self) -> Option<&Location> {
        self.locations.get(&self.character.current_location)
    }

    fn look(&self) {
        match self.current_location() {
            Some(location) => {
                println!("{}", location.name);
                if !location.description.is_empty() {
                    println!("  {}", location.description);
                }
                if location.shop_available {
                    println!("  there is a shop here");
                }
            }
            None => println!("you are at {}", self.character.current_location),
        }
    }

    fn show_stats(&self) {
        let c = &self.character;
        println!(
            "{}, level {} {}",
            c.name,
            c.level,
            c.character_class.as_deref().unwrap_or("adventurer")
        );
        if let Some(personality) = &c.personality {
            println!("  personality: {personality}");
        }
        println!("  hp {}/{}  mp {}/{}", c.hp, c.max_hp, c.mp, c.max_mp);
        println!("  attack {}  defense {}", c.attack, c.defense);
        println!("  gold {}  experience {}", c.gold, c.experience);
        println!("  weapon: {}", equipped_name(&c.equipped_weapon));
        println!("  armor:  {}", equipped_name(&c.equipped_armor));
    }

    fn show_inventory(&self) {
        if self.inventory.is_empty() {
            println!("your pack is empty");
            return;
        }
        for (i, item) in self.inventory.iter().enumerate() {
            let equipped = if item.is_equipped { "  [equipped]" } else { "" };
            println!(
                "  {}. {} x{} ({}){}",
                i + 1,
                item.name,
                item.quantity,
                item.kind.as_str(),
                equipped
            );
        }
    }

    async fn equip(&mut self, arg: &str) {
        let Some(item) = pick(&self.inventory, arg) else {
            println!("usage: equip <n> (see inv)");
            return;
        };
        if !item.kind.is_equippable() {
            println!("{} is not a weapon or armor", item.name);
            return;
        }
        match self.api.equip(item.id).await {
            Ok(response) => {
                if let Some(message) = response.message.or(response.error) {
                    println!("{message}");
                }
                if response.success {
                    if let Some(character) = response.character {
                        self.character = character;
                    }
                    self.refresh_inventory().await;
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }

    async fn show_shop(&mut self) {
        if !self.shop_here() {
            return;
        }
        match self.api.shop_items().await {
            Ok(items) => {
                self.shop_items = items;
                for (i, item) in self.shop_items.iter().enumerate() {
                    println!(
                        "  {}. {} for {} gold, {}",
                        i + 1,
                        item.name,
                        item.price,
                        item.description
                    );
                }
                println!("you have {} gold", self.character.gold);
            }
            Err(e) => println!("error: {e}"),
        }
    }

    async fn buy(&mut self, arg: &str) {
        if !self.shop_here() {
            return;
        }
        let (index, quantity) = match arg.split_once(' ') {
            Some((index, quantity)) => (index, quantity.trim().parse::<i32>().unwrap_or(1)),
            None => (arg, 1),
        };
        let Some(item) = pick(&self.shop_items, index) else {
            println!("usage: buy <n> [qty] (see shop)");
            return;
        };
        match self.api.buy(&item.id, quantity.max(1)).await {
            Ok(response) => {
                if let Some(message) = response.message.or(response.error) {
                    println!("{message}");
                }
                if response.success {
                    if let Some(character) = response.character {
                        self.character = character;
                    }
                    self.refresh_inventory().await;
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }

    fn shop_here(&self) -> bool {
        let available = self
            .current_location()
            .map(|l| l.shop_available)
            .unwrap_or(false);
        if !available {
            println!("there is no shop here");
        }
        available
    }

    fn show_map(&self) {
        if self.locations.is_empty() {
            println!("no map available");
            return;
        }
        let mut locations: Vec<&Location> = self.locations.values().collect();
        locations.sort_by(|a, b| a.id.cmp(&b.id));
        for location in locations {
            let marker = if location.id == self.character.current_location {
                '*'
            } else {
                ' '
            };
            let mut notes = Vec::new();
            if location.shop_available {
                notes.push("shop".to_string());
            }
            if let Some(quest) = &location.requires_quest {
                notes.push(format!("requires quest: {quest}"));
            }
            let notes = if notes.is_empty() {
                String::new()
            } else {
                format!("  ({})", notes.join(", "))
            };
            println!(" {marker} {:<12} {}{notes}", location.id, location.name);
        }
    }

    async fn travel(&mut self, arg: &str) {
        if arg.is_empty() {
            println!("usage: go <location id> (see map)");
            return;
        }
        match self.api.move_to(arg).await {
            Ok(response) => {
                if let Some(message) = response.message.or(response.error) {
                    println!("{message}");
                }
                if response.success {
                    self.character.current_location = arg.to_string();
                    if let Some(location) = response.location {
                        self.locations.insert(location.id.clone(), location);
                    }
                    self.look();
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }

    async fn explore(&mut self) {
        match self.api.explore().await {
            Ok(result) => match result.kind {
                ExploreKind::Combat => {
                    if let Some(state) = result.combat_state {
                        println!("something attacks you!");
                        render_combat(&state);
                        self.combat = Some(state);
                    }
                }
                ExploreKind::Safe => {
                    if let Some(message) = result.message {
                        println!("{message}");
                    }
                }
            },
            Err(e) => println!("error: {e}"),
        }
    }

    fn show_quests(&self) {
        if self.quests.is_empty() {
            println!("no active quests");
            return;
        }
        for quest in &self.quests {
            println!("  {} ({})", quest.name, quest.id);
            if !quest.description.is_empty() {
                println!("    {}", quest.description);
            }
            for objective in &quest.objectives {
                println!("    - {objective}");
            }
            if let Some(rewards) = &quest.rewards {
                let mut parts = Vec::new();
                if rewards.experience > 0 {
                    parts.push(format!("{} exp", rewards.experience));
                }
                if rewards.gold > 0 {
                    parts.push(format!("{} gold", rewards.gold));
                }
                parts.extend(rewards.items.iter().cloned());
                if !parts.is_empty() {
                    println!("    rewards: {}", parts.join(", "));
                }
            }
        }
    }

    async fn narrate(&mut self, text: &str) {
        if text.is_empty() {
            println!("usage: say <something>");
            return;
        }
        self.chat_log.push(NarratorMessage {
            role: Role::User,
            content: text.to_string(),
        });
        let skip = self.chat_log.len().saturating_sub(CONTEXT_WINDOW);
        let context = self.chat_log[skip..].to_vec();

        match self.api.narrator_chat(text, context).await {
            Ok(data) => {
                self.chat_log.push(NarratorMessage {
                    role: Role::Assistant,
                    content: data.message.clone(),
                });
                println!("narrator> {}", data.message);
            }
            Err(e) => println!("error: {e}"),
        }
    }

    async fn refresh_character(&mut self) {
        match self.api.character().await {
            Ok(Some(character)) => self.character = character,
            Ok(None) => {}
            Err(e) => println!("error: {e}"),
        }
    }

    async fn refresh_inventory(&mut self) {
        match self.api.inventory().await {
            Ok(items) => self.inventory = items,
            Err(e) => println!("error: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Combat mode
// ---------------------------------------------------------------------------

impl GameSession {
    async fn handle_combat_command(&mut self, line: &str) {
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command {
            "attack" => self.combat_turn(CombatAction::Attack, None).await,
            "defend" => self.combat_turn(CombatAction::Defend, None).await,
            "flee" => self.combat_turn(CombatAction::Flee, None).await,
            "use" => {
                let Some(item) = pick(&self.inventory, arg) else {
                    println!("usage: use <n> (see inv)");
                    self.show_consumables();
                    return;
                };
                if item.kind != ItemKind::Consumable {
                    println!("{} cannot be used in combat", item.name);
                    return;
                }
                let item_id = item.item_id.clone();
                self.combat_turn(CombatAction::UseItem, Some(item_id)).await;
            }
            "help" => {
                println!("  attack, defend, flee, use <n>");
                self.show_consumables();
            }
            _ => println!("you are in combat: attack, defend, flee, use <n>"),
        }
    }

    fn show_consumables(&self) {
        for (i, item) in self.inventory.iter().enumerate() {
            if item.kind == ItemKind::Consumable {
                println!("  {}. {} x{}", i + 1, item.name, item.quantity);
            }
        }
    }

    async fn combat_turn(&mut self, action: CombatAction, item_id: Option<String>) {
        let Some(state) = self.combat.clone() else {
            return;
        };
        match self.api.combat_action(action, state, item_id).await {
            Ok(response) => {
                if let Some(character) = response.character {
                    self.character = character;
                }
                match response.combat_state {
                    Some(state) => {
                        let active = state
                            .get("active")
                            .and_then(Value::as_bool)
                            .unwrap_or(false);
                        if active {
                            render_combat(&state);
                            self.combat = Some(state);
                        } else {
                            self.finish_combat(&state).await;
                        }
                    }
                    None => self.combat = None,
                }
            }
            Err(e) => println!("error: {e}"),
        }
    }

    async fn finish_combat(&mut self, state: &Value) {
        self.combat = None;
        print_log_tail(state);

        let victory = flag(state, "victory");
        let fled = flag(state, "fled");
        if victory {
            println!("victory!");
            if let Some(loot) = state.get("loot").and_then(Value::as_array) {
                for item in loot.iter().filter_map(Value::as_str) {
                    println!("  looted: {item}");
                }
            }
        } else if fled {
            println!("you got away");
        } else {
            println!("you were defeated");
        }

        self.refresh_character().await;
        self.refresh_inventory().await;
    }
}

fn render_combat(state: &Value) {
    let turn = state.get("turn").and_then(Value::as_i64).unwrap_or(1);
    let enemy = state
        .pointer("/enemy/name")
        .and_then(Value::as_str)
        .unwrap_or("enemy");
    let enemy_hp = state.pointer("/enemy/hp").and_then(Value::as_i64).unwrap_or(0);
    let enemy_max = state
        .pointer("/enemy/max_hp")
        .and_then(Value::as_i64)
        .unwrap_or(enemy_hp);
    println!("turn {turn}: {enemy} {enemy_hp}/{enemy_max} hp");

    let hp = state
        .pointer("/character/hp")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let max_hp = state
        .pointer("/character/max_hp")
        .and_then(Value::as_i64)
        .unwrap_or(hp);
    let mp = state
        .pointer("/character/mp")
        .and_then(Value::as_i64)
        .unwrap_or(0);
    let max_mp = state
        .pointer("/character/max_mp")
        .and_then(Value::as_i64)
        .unwrap_or(mp);
    println!("you: {hp}/{max_hp} hp, {mp}/{max_mp} mp");

    print_log_tail(state);
}

fn print_log_tail(state: &Value) {
    if let Some(log) = state.get("log").and_then(Value::as_array) {
        let skip = log.len().saturating_sub(LOG_TAIL);
        for line in log[skip..].iter().filter_map(Value::as_str) {
            println!("  {line}");
        }
    }
}

fn flag(state: &Value, key: &str) -> bool {
    state.get(key).and_then(Value::as_bool).unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Small helpers
// ---------------------------------------------------------------------------

/// Resolve a 1-based index argument against a displayed list.
fn pick<'a, T>(items: &'a [T], arg: &str) -> Option<&'a T> {
    let index: usize = arg.parse().ok()?;
    (1..=items.len()).contains(&index).then(|| &items[index - 1])
}

fn equipped_name(slot: &Option<InventoryEntry>) -> &str {
    slot.as_ref().map(|item| item.name.as_str()).unwrap_or("none")
}

fn bilingual(name: &str, name_en: Option<&str>) -> String {
    match name_en {
        Some(en) => format!("{name} ({en})"),
        None => name.to_string(),
    }
}

fn stat_summary(stats: &HashMap<String, i32>) -> String {
    let mut entries: Vec<(&String, &i32)> = stats.iter().collect();
    entries.sort();
    entries
        .iter()
        .map(|(k, v)| format!("{k} {v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

async fn prompt_line(lines: &mut InputLines, prompt: &str) -> Result<Option<String>> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    Ok(lines.next_line().await?.map(|line| line.trim().to_string()))
}

async fn confirm(lines: &mut InputLines, prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_help() {
    println!("  look             where you are");
    println!("  stats            character sheet");
    println!("  inv              what you carry");
    println!("  equip <n>        equip a weapon or armor");
    println!("  shop / buy <n>   trade where a shop exists");
    println!("  map              places you know of");
    println!("  go <id>          travel");
    println!("  explore          search the area (may start combat)");
    println!("  quests           active quests");
    println!("  say <text>       talk to the narrator");
    println!("  logout           log out and leave");
    println!("  quit             leave without logging out");
}
