//! Registry of supported games.
//!
//! Every per-game rule (which executables identify a game, where its saves
//! live, which extension they carry, which files must never be backed up)
//! is data in a [`GameProfile`]. Adding a game is a new registry entry, not
//! a new branch in the pipeline.

mod profile;

pub use profile::{GameProfile, SaveLayout};

/// Suffix EU4 appends to its own rolling backup saves.
pub const BACKUP_SUFFIX: &str = "_Backup";

/// Suffix HoI4 uses for in-progress temporary saves.
pub const TEMP_SUFFIX: &str = "_temp";

/// Inner save file of a Stellaris ironman run folder.
pub const IRONMAN_SAVE: &str = "ironman.sav";

/// Ordered collection of game profiles.
///
/// Order matters: detection walks profiles in declaration order and the
/// first match wins.
#[derive(Debug, Clone, Default)]
pub struct GameRegistry {
    profiles: Vec<GameProfile>,
}

impl GameRegistry {
    /// Creates a registry from the given profiles, keeping their order.
    pub fn new(profiles: Vec<GameProfile>) -> Self {
        Self { profiles }
    }

    /// Returns the built-in registry of Paradox titles.
    pub fn paradox() -> Self {
        let excluded = [BACKUP_SUFFIX, TEMP_SUFFIX];
        let file_game = |name: &str, processes: &[&str], extension: &str| {
            GameProfile::new(name, processes, extension).with_excluded_suffixes(&excluded)
        };

        Self::new(vec![
            GameProfile::new("Stellaris", &["stellaris.exe"], ".sav")
                .with_layout(SaveLayout::Directory {
                    inner_file: IRONMAN_SAVE.into(),
                }),
            file_game("Europa Universalis IV", &["eu4.exe"], ".eu4"),
            file_game("Crusader Kings III", &["ck3.exe"], ".ck3"),
            file_game("Crusader Kings II", &["CK2game.exe"], ".ck2"),
            file_game("Hearts of Iron IV", &["hoi4.exe"], ".hoi4"),
            file_game("Imperator", &["imperator.exe"], ".rome"),
            file_game("Victoria II", &["victoria2.exe", "v2game.exe"], ".v2"),
        ])
    }

    /// Appends extra profiles after the existing ones.
    ///
    /// A profile whose name is already registered is ignored, so extras can
    /// never shadow or outrank an existing entry.
    pub fn with_extra(mut self, extra: impl IntoIterator<Item = GameProfile>) -> Self {
        for profile in extra {
            if self.by_name(&profile.name).is_some() {
                tracing::warn!(game = %profile.name, "duplicate game profile ignored");
                continue;
            }
            tracing::debug!(game = %profile.name, "registered extra game profile");
            self.profiles.push(profile);
        }
        self
    }

    /// Returns all profiles in detection order.
    pub fn profiles(&self) -> &[GameProfile] {
        &self.profiles
    }

    /// Iterates profiles in detection order.
    pub fn iter(&self) -> impl Iterator<Item = &GameProfile> {
        self.profiles.iter()
    }

    /// Looks up a profile by its canonical game name.
    pub fn by_name(&self, name: &str) -> Option<&GameProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Returns the first profile identified by `executable` (case-sensitive).
    pub fn by_process(&self, executable: &str) -> Option<&GameProfile> {
        self.profiles.iter().find(|p| p.matches_process(executable))
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
