//! Line-oriented terminal front end for the book.
//!
//! Renders the current page (or the view replacing it) after every change and
//! reads one command per line. Image timers keep running while waiting for
//! input, so a timed illustration sequence advances on its own.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use talebook_domain::{
    ChapterId, ChoiceId, CombatPhase, GameSetup, Hero, HeroSelection, Scene, SceneId,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::services::{BookSession, CombatService, CombatSession, HeroService};
use crate::state::{SceneView, SpecialSceneView, ViewAction, ViewOutcome};

/// One line of player input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Choose(ChoiceId),
    Jump(String),
    Continue,
    Win,
    Lose,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        match word.to_ascii_lowercase().as_str() {
            "n" | "next" => Some(Self::Next),
            "p" | "prev" | "previous" => Some(Self::Previous),
            "j" | "jump" => Some(Self::Jump(rest.to_string())),
            "c" | "continue" => Some(Self::Continue),
            "w" | "win" => Some(Self::Win),
            "l" | "lose" => Some(Self::Lose),
            "h" | "help" | "?" => Some(Self::Help),
            "q" | "quit" | "exit" => Some(Self::Quit),
            other => other.parse::<i64>().ok().map(|id| Self::Choose(ChoiceId::new(id))),
        }
    }
}

const HELP: &str = "\
  n          next page
  p          previous page
  <number>   pick the choice with that number
  c          continue (combat)
  w / l      win / lose (board game)
  j <id>     jump to scene (developer tools)
  q          quit";

/// Text of the current page.
pub fn render_page(session: &BookSession) -> String {
    let engine = session.engine();
    if engine.is_loading() {
        return "Loading...".to_string();
    }
    if let Some(error) = engine.error() {
        return format!("! {error}");
    }
    let Some(scene) = engine.current_scene() else {
        return "The book is empty.".to_string();
    };

    let mut out = String::new();
    if let Some(location) = scene.scene_location() {
        out.push_str(&format!("[{location}]\n"));
    }
    if let Some(url) = engine.current_image_url() {
        out.push_str(&format!("(image: {url})\n"));
    }
    for paragraph in engine.accumulated_text() {
        out.push_str(paragraph);
        out.push_str("\n\n");
    }
    for choice in engine.current_choices() {
        out.push_str(&format!("  {}. {}\n", choice.id(), choice.text()));
    }
    if engine.can_go_next() && engine.get_next_scene().is_some() {
        out.push_str("  (n) next page\n");
    }
    if session.dev_tools_enabled() {
        out.push_str(&format!("  [dev] scene {}\n", scene.id()));
    }
    out.trim_end().to_string()
}

fn render_combat(combat: &CombatSession) -> String {
    if let Some(error) = combat.error() {
        return format!("! {error}\n  (c) continue");
    }
    let Some(data) = combat.data() else {
        return "Loading combat...".to_string();
    };
    let mut out = String::new();
    match combat.phase() {
        CombatPhase::Enemies => {
            out.push_str(if data.has_boss() {
                "A boss blocks the way!\n"
            } else {
                "Enemies approach!\n"
            });
            for enemy in &data.enemies {
                out.push_str(&format!(
                    "  {} (vitality {}, attack {})\n",
                    enemy.name, enemy.stats.vitality, enemy.stats.physical_attack
                ));
            }
            out.push_str("  (c) fight");
        }
        CombatPhase::Rewards => {
            out.push_str(&format!("Victory! {} experience\n", data.exp_points_total));
            for reward in &data.rewards {
                out.push_str(&format!("  {} x{}\n", reward.name, reward.quantity));
            }
            out.push_str("  (c) continue");
        }
    }
    out
}

/// Stand-in for the weapon-selection video: a short pause, then done.
pub struct WeaponSelectionInterlude {
    duration: Duration,
}

impl WeaponSelectionInterlude {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl SpecialSceneView for WeaponSelectionInterlude {
    async fn run(&self, scene: &Scene) -> ViewOutcome {
        println!("~ {} ~", scene.text());
        tokio::time::sleep(self.duration).await;
        ViewOutcome::Completed
    }
}

/// The terminal book: hero draft, then reading until the player quits.
pub struct TerminalBook {
    session: BookSession,
    combat_service: CombatService,
    hero_service: HeroService,
    combat: Option<CombatSession>,
    players: Vec<String>,
}

impl TerminalBook {
    pub fn new(
        session: BookSession,
        combat_service: CombatService,
        hero_service: HeroService,
        players: Vec<String>,
    ) -> Self {
        Self {
            session,
            combat_service,
            hero_service,
            combat: None,
            players,
        }
    }

    pub async fn run(mut self, chapter_id: ChapterId) -> Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        if let Some(setup) = self.draft_heroes(&mut lines).await? {
            for player in setup.players() {
                println!(
                    "{} plays {}",
                    player.name(),
                    player.hero_code().unwrap_or("no hero")
                );
            }
        }

        self.session.open_chapter(chapter_id).await;
        loop {
            self.show().await;

            let line = tokio::select! {
                line = lines.next_line() => line.context("Failed to read input")?,
                _ = self.session.engine_mut().next_image_advance() => continue,
            };
            let Some(line) = line else {
                tracing::info!("Input closed");
                return Ok(());
            };
            let Some(command) = Command::parse(&line) else {
                println!("Unknown command, h for help");
                continue;
            };
            if !self.handle(command).await {
                return Ok(());
            }
        }
    }

    async fn show(&mut self) {
        match self.session.current_view() {
            None => {
                self.combat = None;
                println!("\n{}", render_page(&self.session));
            }
            Some(SceneView::GameOver) => println!("\n*** GAME OVER ***\n  q to quit"),
            Some(SceneView::Combat { .. }) => {
                let scene_id = self.current_scene_id();
                let stale = self.combat.as_ref().map(CombatSession::scene_id) != scene_id;
                if let (true, Some(scene_id)) = (stale, scene_id) {
                    self.combat = Some(CombatSession::load(&self.combat_service, scene_id).await);
                }
                if let Some(combat) = &self.combat {
                    println!("\n{}", render_combat(combat));
                }
            }
            Some(SceneView::BoardGame { resource, .. }) => println!(
                "\nBoard game {}\n  (w) win  (l) lose",
                resource.as_deref().unwrap_or("")
            ),
            Some(SceneView::Special { .. }) => {
                if let Some(action) = self.session.run_special_view().await {
                    tracing::debug!(?action, "Special view completed");
                }
                println!("\n{}", render_page(&self.session));
            }
        }
    }

    /// Returns `false` when the player quits.
    async fn handle(&mut self, command: Command) -> bool {
        let view = self.session.current_view();
        match command {
            Command::Quit => return false,
            Command::Help => println!("{HELP}"),
            Command::Next => {
                if !self.session.next_page().await {
                    println!("You cannot turn the page yet.");
                }
            }
            Command::Previous => {
                self.session.previous_page().await;
            }
            Command::Choose(id) => {
                if !self.session.select_choice(id).await {
                    println!("No such choice.");
                }
            }
            Command::Jump(input) => match self.session.dev_jump(&input) {
                Ok(id) => tracing::info!(scene_id = %id, "Developer jump"),
                Err(e) => println!("{e}"),
            },
            Command::Continue => {
                if let Some(view @ SceneView::Combat { .. }) = view {
                    self.continue_combat(&view);
                }
            }
            Command::Win => self.finish_board_game(view, ViewOutcome::Completed),
            Command::Lose => self.finish_board_game(view, ViewOutcome::Failed),
        }
        true
    }

    fn continue_combat(&mut self, view: &SceneView) {
        let fighting = self
            .combat
            .as_ref()
            .is_some_and(|c| c.phase() == CombatPhase::Enemies && c.error().is_none());
        if fighting {
            if let Some(combat) = self.combat.as_mut() {
                combat.finish_fight();
            }
            return;
        }
        self.combat = None;
        self.resolve(view.action_for(ViewOutcome::Completed));
    }

    fn finish_board_game(&mut self, view: Option<SceneView>, outcome: ViewOutcome) {
        if let Some(view @ SceneView::BoardGame { .. }) = view {
            self.resolve(view.action_for(outcome));
        }
    }

    fn resolve(&mut self, action: Option<ViewAction>) {
        if let Some(action) = action {
            if !self.session.resolve(action) {
                println!("The story cannot continue from here.");
            }
        }
    }

    fn current_scene_id(&self) -> Option<SceneId> {
        self.session.engine().current_scene().map(Scene::id)
    }

    async fn draft_heroes(&self, lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<GameSetup>> {
        let heroes = match self.hero_service.list_heroes().await {
            Ok(heroes) if !heroes.is_empty() => heroes,
            Ok(_) => return Ok(None),
            Err(e) => {
                tracing::warn!(error = %e, "Hero catalog unavailable, skipping hero selection");
                return Ok(None);
            }
        };
        let mut setup = GameSetup::new(self.players.iter().cloned())?;

        while let Some(player) = setup.current_player() {
            let available: Vec<&Hero> = setup.available_heroes(&heroes);
            println!("\n{}, choose your hero:", player.name());
            for (n, hero) in available.iter().enumerate() {
                println!("  {}. {}", n + 1, hero.display_name());
            }

            let Some(line) = lines.next_line().await.context("Failed to read input")? else {
                return Ok(None);
            };
            let Some(hero) = line
                .trim()
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| available.get(i))
            else {
                println!("Pick a number from the list.");
                continue;
            };
            let code = hero.code.clone();
            match setup.select_hero(&heroes, &code) {
                Ok(HeroSelection::SelectionComplete { .. }) => break,
                Ok(HeroSelection::Assigned { .. }) => {}
                Err(e) => println!("{e}"),
            }
        }
        Ok(Some(setup))
    }
}
