//! Interactive pet chat loop.
//!
//! Owns the startup sequence (store, caches, scene list, decay ticker),
//! the prompt loop, and the slash commands layered over plain chat. Any
//! line that is not a command goes to the pet. Failed calls surface as a
//! transient banner above the next prompt and never end the loop.

use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::api::types::{Role, Scene};
use crate::api::ApiClient;
use crate::config::Config;
use crate::pet::cache::StatusCache;
use crate::pet::history::ChatHistory;
use crate::pet::status::{StatusLevel, StatusRecord};
use crate::pet::ticker::start_ticker;
use crate::store::{CacheStore, StoreError, KEY_CURRENT_SCENE};

/// How many stored transcript entries are replayed at startup.
const REPLAY_TAIL: usize = 6;

/// How long an error stays worth showing.
const BANNER_TTL: Duration = Duration::from_secs(5);

type InputLines = Lines<BufReader<Stdin>>;

pub struct PetSession {
    api: ApiClient,
    store: CacheStore,
    cache: Arc<Mutex<StatusCache>>,
    history: ChatHistory,
    scenes: Vec<Scene>,
    current_scene: Option<String>,
    banner: Option<(String, Instant)>,
    is_loading: bool,
}

pub async fn run(config: &Config) -> Result<()> {
    let api = ApiClient::new(&config.server.base_url)?;
    let store = CacheStore::open(&config.storage.data_dir)?;
    let cache = Arc::new(Mutex::new(StatusCache::load(store.clone(), Utc::now())?));
    let history = ChatHistory::load(store.clone())?;

    match api.health().await {
        Ok(health) if !health.gemini_configured => {
            println!("note: the backend has no language model configured, replies will fail");
        }
        Ok(_) => {}
        Err(e) => println!("note: backend not reachable ({e}), chat will fail until it is"),
    }

    let scenes = match api.scenes().await {
        Ok(scenes) => scenes,
        Err(e) => {
            log::warn!("scene list unavailable: {e}");
            println!("note: scene list unavailable ({e})");
            Vec::new()
        }
    };

    let mut session = PetSession {
        api,
        store,
        cache: cache.clone(),
        history,
        scenes,
        current_scene: None,
        banner: None,
        is_loading: false,
    };
    session.restore_scene()?;

    let ticker = start_ticker(cache.clone(), config.pet.decay_interval());

    session.print_banner_lines().await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if let Some(message) = session.take_banner() {
            println!("! {message}");
        }
        print!("you> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('/') {
            if session.handle_command(rest, &mut lines).await? {
                break;
            }
        } else {
            session.send(&line).await;
        }
    }

    ticker.shutdown().await;
    cache.lock().await.persist(Utc::now())?;
    println!("goodbye");
    Ok(())
}

impl PetSession {
    /// Re-enter the saved scene if it still exists, otherwise fall back to
    /// the first scene the backend offers.
    fn restore_scene(&mut self) -> Result<(), StoreError> {
        let saved: Option<String> = self.store.get(KEY_CURRENT_SCENE)?;
        let id = match saved {
            Some(id) if self.scenes.iter().any(|s| s.id == id) => Some(id),
            _ => self.scenes.first().map(|s| s.id.clone()),
        };
        if let Some(id) = id {
            self.set_scene(&id)?;
        }
        Ok(())
    }

    fn set_scene(&mut self, id: &str) -> Result<(), StoreError> {
        self.current_scene = Some(id.to_string());
        self.store.put(KEY_CURRENT_SCENE, &id)
    }

    fn scene_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.scenes
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
            .unwrap_or(id)
    }

    fn set_banner(&mut self, message: String) {
        self.banner = Some((message, Instant::now()));
    }

    fn take_banner(&mut self) -> Option<String> {
        let (message, raised) = self.banner.take()?;
        (raised.elapsed() <= BANNER_TTL).then_some(message)
    }

    async fn print_banner_lines(&self) {
        println!(
            "petshell v{} (type /help for commands)",
            env!("CARGO_PKG_VERSION")
        );
        if let Some(id) = &self.current_scene {
            println!("scene: {}", self.scene_name(id));
        }
        let status = self.cache.lock().await.status();
        println!("your pet is feeling {}", status.condition().as_str());

        let tail = self.history.messages();
        let skip = tail.len().saturating_sub(REPLAY_TAIL);
        for message in &tail[skip..] {
            println!(
                "[{}] {}: {}",
                message.timestamp,
                speaker(message.role),
                message.content
            );
        }
    }

    /// Returns `true` when the session should end.
    async fn handle_command(&mut self, input: &str, lines: &mut InputLines) -> Result<bool> {
        let (command, arg) = match input.split_once(' ') {
            Some((command, arg)) => (command, arg.trim()),
            None => (input, ""),
        };

        match command {
            "status" => self.show_status().await,
            "scenes" => self.show_scenes().await,
            "scene" => self.scene_command(arg)?,
            "tools" => self.show_tools().await,
            "mcp" => self.run_tool(arg).await,
            "clear" => {
                if confirm(lines, "clear the saved transcript? [y/N] ").await? {
                    self.history.clear()?;
                    println!("(transcript cleared)");
                }
            }
            "help" => print_help(),
            "quit" | "exit" => return Ok(true),
            other => println!("unknown command: /{other} (see /help)"),
        }
        Ok(false)
    }

    async fn send(&mut self, text: &str) {
        if self.is_loading {
            return;
        }
        self.is_loading = true;
        let result = self.chat_turn(text).await;
        self.is_loading = false;
        if let Err(e) = result {
            self.set_banner(e.to_string());
        }
    }

    async fn chat_turn(&mut self, text: &str) -> Result<()> {
        self.history.push_user(text)?;
        let context = self.history.context_window();
        let status = self.cache.lock().await.status();

        let data = self
            .api
            .chat(text, self.current_scene.as_deref(), context, Some(status))
            .await?;

        if let Some(container) = &data.status {
            if let Some(values) = container.values {
                let mut cache = self.cache.lock().await;
                if !cache.reconcile(&values, Utc::now())? {
                    log::debug!("incomplete status payload ignored");
                }
            }
        }

        if let Some(suggested) = data.scene.clone() {
            if self.current_scene.as_deref() != Some(suggested.as_str())
                && self.scenes.iter().any(|s| s.id == suggested)
            {
                println!("(moved to {})", self.scene_name(&suggested));
                self.set_scene(&suggested)?;
            }
        }

        self.history
            .push_assistant(&data.message, data.mcp_output.clone())?;

        match &data.emoji {
            Some(emoji) => println!("pet> {emoji} {}", data.message),
            None => println!("pet> {}", data.message),
        }
        if let Some(output) = &data.mcp_output {
            print_tool_output(output);
        }
        Ok(())
    }

    async fn show_status(&self) {
        print_gauges(self.cache.lock().await.status());
    }

    async fn show_scenes(&mut self) {
        match self.api.scenes().await {
            Ok(scenes) => {
                self.scenes = scenes;
                if self.scenes.is_empty() {
                    println!("the backend offers no scenes");
                }
                for scene in &self.scenes {
                    let marker = if self.current_scene.as_deref() == Some(scene.id.as_str()) {
                        '*'
                    } else {
                        ' '
                    };
                    println!(" {marker} {:<14} {}", scene.id, scene.name);
                }
            }
            Err(e) => self.set_banner(e.to_string()),
        }
    }

    fn scene_command(&mut self, arg: &str) -> Result<(), StoreError> {
        if arg.is_empty() {
            match &self.current_scene {
                Some(id) => self.describe_scene(&id.clone()),
                None => println!("no scene yet (see /scenes)"),
            }
            return Ok(());
        }
        if self.scenes.iter().any(|s| s.id == arg) {
            self.set_scene(arg)?;
            self.describe_scene(arg);
        } else {
            println!("unknown scene: {arg} (see /scenes)");
        }
        Ok(())
    }

    fn describe_scene(&self, id: &str) {
        let Some(scene) = self.scenes.iter().find(|s| s.id == id) else {
            println!("scene: {id}");
            return;
        };
        println!("scene: {} ({})", scene.name, scene.id);
        if let Some(description) = &scene.description {
            println!("  {description}");
        }
        if !scene.activities.is_empty() {
            println!("  activities: {}", scene.activities.join(", "));
        }
    }

    async fn show_tools(&mut self) {
        match self.api.mcp_tools().await {
            Ok(tools) => {
                for tool in &tools {
                    println!("  {:<18} {}", tool.name, tool.description);
                    if !tool.parameters.is_empty() {
                        println!("  {:<18} args: {}", "", tool.parameters.join(", "));
                    }
                }
            }
            Err(e) => self.set_banner(e.to_string()),
        }
    }

    async fn run_tool(&mut self, arg: &str) {
        if arg.is_empty() {
            println!("usage: /mcp <command>");
            return;
        }
        match self.api.mcp_execute(arg).await {
            Ok(result) => match result.get("output") {
                Some(Value::String(text)) => {
                    for line in text.lines() {
                        println!("  | {line}");
                    }
                }
                _ => print_tool_output(&result),
            },
            Err(e) => self.set_banner(e.to_string()),
        }
    }
}

/// One-shot offline view of the cached condition, for the `status`
/// subcommand. Charges for elapsed time in memory; nothing is persisted.
pub fn show_status(config: &Config) -> Result<()> {
    let store = CacheStore::open(&config.storage.data_dir)?;
    let cache = StatusCache::load(store, Utc::now())?;
    print_gauges(cache.status());
    Ok(())
}

fn print_gauges(status: StatusRecord) {
    for (name, value) in status.entries() {
        println!(
            "  {:<10} {} {}",
            name,
            gauge(value),
            StatusLevel::for_value(value).as_str()
        );
    }
    println!("  overall: {}", status.condition().as_str());
}

async fn confirm(lines: &mut InputLines, prompt: &str) -> Result<bool> {
    print!("{prompt}");
    std::io::stdout().flush()?;
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn speaker(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "pet",
    }
}

fn gauge(value: i32) -> String {
    let filled = (value.clamp(0, 100) / 10) as usize;
    format!("[{}{}] {:>3}", "#".repeat(filled), "-".repeat(10 - filled), value)
}

fn print_tool_output(output: &Value) {
    let text = match output {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    };
    for line in text.lines() {
        println!("  | {line}");
    }
}

fn print_help() {
    println!("  /status        show the pet's condition");
    println!("  /scenes        list scenes");
    println!("  /scene [id]    show or switch the current scene");
    println!("  /tools         list backend tools");
    println!("  /mcp <cmd>     run a backend tool command");
    println!("  /clear         wipe the saved transcript");
    println!("  /quit          leave");
    println!("  anything else is said to your pet");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_fills_one_segment_per_ten_points() {
        assert_eq!(gauge(0), "[----------]   0");
        assert_eq!(gauge(47), "[####------]  47");
        assert_eq!(gauge(100), "[##########] 100");
    }

    #[test]
    fn speaker_labels() {
        assert_eq!(speaker(Role::User), "you");
        assert_eq!(speaker(Role::Assistant), "pet");
    }

    #[test]
    fn banner_shows_once_and_expires() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path().join("cache")).unwrap();
        let cache = Arc::new(Mutex::new(
            StatusCache::load(store.clone(), Utc::now()).unwrap(),
        ));
        let history = ChatHistory::load(store.clone()).unwrap();
        let mut session = PetSession {
            api: ApiClient::new("http://127.0.0.1:1").unwrap(),
            store,
            cache,
            history,
            scenes: Vec::new(),
            current_scene: None,
            banner: None,
            is_loading: false,
        };

        session.set_banner("boom".to_string());
        assert_eq!(session.take_banner().as_deref(), Some("boom"));
        assert!(session.take_banner().is_none());

        session.banner = Some(("stale".to_string(), Instant::now() - Duration::from_secs(6)));
        assert!(session.take_banner().is_none());
    }
}
