//! Interactive menu
//!
//! The menu is a state machine. [`transition`] maps the current screen and
//! one line of input to the next screen plus an [`Effect`]. [`Menu`] renders
//! screens, reads input, applies effects and runs fix-ups.
//!
//! ```text
//! MainMenu ─1─> ResourcePackMenu ─1─> ResourcePackName ─name─> FixResourcePack
//!    │                │          └─2─> ResourcePackList ─n──> FixResourcePack
//!    ├─2─> Settings ─1─> SettingsFolderMode
//!    └─3─> Exit
//! ```
//!
//! `0` goes back one screen. A fix-up returns to the screen it was started from.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use atlas_core::{fixup, list_packs, validate_pack_name, FixupConfig, FolderMode};

use crate::settings::{self, Settings};
use crate::terminal::{self, CLEAR_SCREEN};
use crate::RootArgs;

/// Why a numeric menu action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Input must be a number!")]
    NotANumber,

    #[error("Input is out of range!")]
    OutOfRange,
}

/// Parse a menu action and check it lies in `min..=max`.
///
/// Only plain digits are accepted; signs and whitespace are not numbers.
pub fn parse_action(input: &str, min: usize, max: usize) -> Result<usize, ActionError> {
    if input.is_empty() || !input.chars().all(|c| c.is_ascii_digit()) {
        return Err(ActionError::NotANumber);
    }
    match input.parse::<usize>() {
        Ok(action) if (min..=max).contains(&action) => Ok(action),
        _ => Err(ActionError::OutOfRange),
    }
}

/// Screen the menu is on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuState {
    MainMenu,
    Settings,
    SettingsFolderMode,
    ResourcePackMenu,
    ResourcePackName,
    ResourcePackList,
    FixResourcePack { pack: String, entry: PackEntry },
    Exit,
}

/// How the pack being fixed was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackEntry {
    ByName,
    FromList,
}

impl PackEntry {
    /// Screen to return to after the fix-up.
    pub fn screen(self) -> MenuState {
        match self {
            PackEntry::ByName => MenuState::ResourcePackName,
            PackEntry::FromList => MenuState::ResourcePackList,
        }
    }
}

impl MenuState {
    fn prompt(&self) -> &'static str {
        match self {
            MenuState::SettingsFolderMode => " Folder Mode: ",
            MenuState::ResourcePackName => " Resource pack: ",
            _ => " Action: ",
        }
    }
}

/// What the menu knows when handling input.
#[derive(Debug, Clone)]
pub struct MenuContext {
    pub config: FixupConfig,
    pub folder_mode: FolderMode,
    /// Packs shown on the list screen, in display order.
    pub packs: Vec<String>,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Shown before the next prompt.
    Error(String),
    SetFolderMode(FolderMode),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: MenuState,
    pub effect: Effect,
}

impl Transition {
    fn to(next: MenuState) -> Self {
        Self {
            next,
            effect: Effect::None,
        }
    }

    fn stay(state: &MenuState, error: impl ToString) -> Self {
        Self {
            next: state.clone(),
            effect: Effect::Error(error.to_string()),
        }
    }
}

/// Next screen for one line of input.
///
/// `FixResourcePack` and `Exit` do not read input and stay where they are.
pub fn transition(state: &MenuState, input: &str, ctx: &MenuContext) -> Transition {
    let choose = |min: usize, max: usize| parse_action(input, min, max);

    match state {
        MenuState::MainMenu => match choose(1, 3) {
            Ok(1) => Transition::to(MenuState::ResourcePackMenu),
            Ok(2) => Transition::to(MenuState::Settings),
            Ok(_) => Transition::to(MenuState::Exit),
            Err(e) => Transition::stay(state, e),
        },

        MenuState::Settings => match choose(0, 1) {
            Ok(0) => Transition::to(MenuState::MainMenu),
            Ok(_) => Transition::to(MenuState::SettingsFolderMode),
            Err(e) => Transition::stay(state, e),
        },

        MenuState::SettingsFolderMode => {
            let mode = match choose(0, 2) {
                Ok(0) => return Transition::to(MenuState::Settings),
                Ok(1) => FolderMode::Singles,
                Ok(_) => FolderMode::Folders,
                Err(e) => return Transition::stay(state, e),
            };
            Transition {
                next: MenuState::Settings,
                effect: Effect::SetFolderMode(mode),
            }
        }

        MenuState::ResourcePackMenu => match choose(0, 2) {
            Ok(0) => Transition::to(MenuState::MainMenu),
            Ok(1) => Transition::to(MenuState::ResourcePackName),
            Ok(_) => Transition::to(MenuState::ResourcePackList),
            Err(e) => Transition::stay(state, e),
        },

        MenuState::ResourcePackName => {
            if input == "0" {
                return Transition::to(MenuState::ResourcePackMenu);
            }
            match validate_pack_name(&ctx.config, input) {
                Ok(_) => Transition::to(MenuState::FixResourcePack {
                    pack: input.to_string(),
                    entry: PackEntry::ByName,
                }),
                Err(e) => Transition::stay(state, e),
            }
        }

        MenuState::ResourcePackList => match choose(0, ctx.packs.len()) {
            Ok(0) => Transition::to(MenuState::ResourcePackMenu),
            Ok(n) => Transition::to(MenuState::FixResourcePack {
                pack: ctx.packs[n - 1].clone(),
                entry: PackEntry::FromList,
            }),
            Err(e) => Transition::stay(state, e),
        },

        MenuState::FixResourcePack { .. } | MenuState::Exit => Transition::to(state.clone()),
    }
}

fn title() -> String {
    format!(
        "{CLEAR_SCREEN}\n\n Atlas Logger - By Dominexis - {}\n\n",
        env!("CARGO_PKG_VERSION")
    )
}

/// Screen text for `state`.
pub fn render(state: &MenuState, ctx: &MenuContext) -> String {
    match state {
        MenuState::MainMenu => format!(
            "{} Settings:\n  Folder Mode: {}\n\n Actions:\n  1) Fix resource pack\n  2) Change settings\n  3) Exit program\n\n",
            title(),
            ctx.folder_mode
        ),
        MenuState::Settings => format!(
            "{} Edit settings:\n  0) Go back\n  1) Folder Mode: {}\n\n",
            title(),
            ctx.folder_mode
        ),
        MenuState::SettingsFolderMode => format!(
            "{}\n Folder Mode:\n  1) Singles - Processes each file individually. This prevents unwanted textures from getting through, but makes it harder to edit.\n  2) Folders - Logs entire directories. This makes it easier to edit, but can include unwanted files in the block atlas.\n\n",
            render(&MenuState::Settings, ctx)
        ),
        MenuState::ResourcePackMenu => format!(
            "{} Fix resource pack:\n  0) Go back\n  1) Fix resource pack by name\n  2) Fix resource pack from a list\n\n",
            title()
        ),
        MenuState::ResourcePackName => format!(
            "{} Fix resource pack by name. Enter \"0\" to go back.\n\n",
            title()
        ),
        MenuState::ResourcePackList => {
            let mut text = format!("{} Fix resource pack:\n  0) Go back\n", title());
            for (index, pack) in ctx.packs.iter().enumerate() {
                text.push_str(&format!("  {}) {}\n", index + 1, pack));
            }
            text.push('\n');
            text
        }
        MenuState::FixResourcePack { .. } | MenuState::Exit => String::new(),
    }
}

/// Menu driver: owns the current screen and the pending message.
pub struct Menu {
    state: MenuState,
    ctx: MenuContext,
    settings: Settings,
    settings_file: Option<PathBuf>,
    message: String,
}

impl Menu {
    /// `settings_file` receives folder mode changes; `None` keeps them in memory.
    pub fn new(root: &Path, settings: Settings, settings_file: Option<PathBuf>) -> Self {
        Self {
            state: MenuState::MainMenu,
            ctx: MenuContext {
                config: settings.fixup_config(root),
                folder_mode: settings.atlas.folder_mode,
                packs: Vec::new(),
            },
            settings,
            settings_file,
            message: String::new(),
        }
    }

    /// Run until the user exits or the input ends.
    pub fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        loop {
            let state = self.state.clone();
            match state {
                MenuState::Exit => return Ok(()),

                MenuState::FixResourcePack { pack, entry } => {
                    self.fix(&pack, input, output);
                    self.state = entry.screen();
                }

                state => {
                    if state == MenuState::ResourcePackList {
                        self.refresh_packs();
                    }
                    output.write_all(render(&state, &self.ctx).as_bytes())?;

                    let prompt = format!("{}{}", self.message, state.prompt());
                    let Some(line) = terminal::read_line(input, output, &prompt)? else {
                        writeln!(output)?;
                        return Ok(());
                    };

                    let Transition { next, effect } = transition(&state, &line, &self.ctx);
                    self.message.clear();
                    self.apply(effect);
                    self.state = next;
                }
            }
        }
    }

    fn refresh_packs(&mut self) {
        match list_packs(&self.ctx.config) {
            Ok(packs) => self.ctx.packs = packs,
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", self.ctx.config.root.display(), e);
                self.ctx.packs.clear();
                self.message = format!(" ERROR: Failed to list resource packs: {e}\n");
            }
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::None => {}
            Effect::Error(error) => self.message = format!(" ERROR: {error}\n"),
            Effect::SetFolderMode(mode) => {
                self.ctx.folder_mode = mode;
                self.settings.atlas.folder_mode = mode;
                if let Some(path) = &self.settings_file {
                    if let Err(e) = settings::save_to(path, &self.settings) {
                        tracing::warn!("{:#}", e);
                        self.message = format!(" WARNING: Folder mode was not saved: {e}\n");
                    }
                }
            }
        }
    }

    fn fix<R: BufRead, W: Write>(&mut self, pack: &str, input: &mut R, output: &mut W) {
        let mut decision =
            |atlas: &Path| terminal::confirm_overwrite(&mut *input, &mut *output, atlas);
        let report = fixup(&self.ctx.config, pack, self.ctx.folder_mode, &mut decision);
        self.message = terminal::report_lines(&report);
    }
}

/// Execute the interactive menu on stdin/stdout
pub fn execute(args: RootArgs) -> Result<()> {
    let root = args.resolve()?;
    let mut menu = Menu::new(&root, settings::load(), settings::settings_file());

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();
    menu.run(&mut input, &mut output)
        .context("Terminal I/O failed")
}
