// Integration tests for the Focus Keeper sound library
// These drive the public API against a throwaway home directory

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use focus_keeper_sounds::audio_system::VoiceOptions;
use focus_keeper_sounds::{
    AppPaths, AppSetup, AssetCategory, AssetLocation, AssetStore, AudioBackend, ConfigStore,
    EventBus, LibraryError, LibraryEvent, PlaybackController, PlaybackError, Role, RoleBinding,
    SeedSources, SoundLibrary, Voice,
};

struct Home {
    _tmp: tempfile::TempDir,
    paths: AppPaths,
    config: Arc<ConfigStore>,
    library: SoundLibrary,
}

/// Fresh home with the given built-in files and reserved names
fn home(built_in_sounds: &[&str], built_in_ambiences: &[&str], reserved: &[&str]) -> Home {
    let tmp = tempfile::tempdir().unwrap();
    let paths = AppPaths::under(tmp.path().join("FocusKeeper"));
    let (config, _report) = AppSetup::run(&paths, &SeedSources::default()).unwrap();

    for name in built_in_sounds {
        write_audio(&paths.sounds_dir().join(name));
    }
    for name in built_in_ambiences {
        write_audio(&paths.ambiences_dir().join(name));
    }

    let config = Arc::new(config);
    let store = AssetStore::new(paths.clone()).with_reserved_names(reserved.iter().copied());
    let library = SoundLibrary::new(store, Arc::clone(&config));
    Home {
        _tmp: tmp,
        paths,
        config,
        library,
    }
}

fn write_audio(path: &Path) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"RIFF\0\0\0\0WAVEfmt ").unwrap();
}

/// A file outside the library, ready to import
fn incoming(home: &Home, file_name: &str) -> PathBuf {
    let path = home.paths.home().join("Downloads").join(file_name);
    write_audio(&path);
    path
}

fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    names.sort();
    names
}

fn assert_unique(home: &Home, category: AssetCategory) {
    let names = home.library.store().list_assets(category).unwrap();
    let mut deduped = names.clone();
    deduped.dedup();
    assert_eq!(names, deduped, "duplicate base names in {category}");
}

#[test]
fn scenario_a_lists_built_in_sounds() {
    let home = home(&["chime.ogg", "bell.wav"], &[], &[]);

    let names = home.library.store().list_assets(AssetCategory::Sound).unwrap();
    assert_eq!(names, vec!["bell", "chime"]);
}

#[test]
fn scenario_b_import_ambient() {
    let home = home(&[], &["forest.ogg"], &["forest"]);
    let source = incoming(&home, "loop.wav");

    let asset = home
        .library
        .import_asset(AssetCategory::Ambient, &source)
        .unwrap();
    assert_eq!(asset.location, AssetLocation::User);

    let names = home.library.store().list_assets(AssetCategory::Ambient).unwrap();
    assert!(names.contains(&"loop".to_string()));
    assert_eq!(
        home.config.get_role_binding(Role::Ambient).unwrap(),
        *home.config.fallback(Role::Ambient).unwrap(),
        "import never assigns a role"
    );
}

#[test]
fn scenario_c_rename_to_reserved_name_fails() {
    let home = home(&[], &[], &["forest"]);
    let source = incoming(&home, "loop.wav");
    home.library
        .import_asset(AssetCategory::Ambient, &source)
        .unwrap();
    let before = home.library.store().list_assets(AssetCategory::Ambient).unwrap();

    let err = home
        .library
        .rename_asset(AssetCategory::Ambient, AssetLocation::User, "loop", "forest")
        .unwrap_err();

    assert!(matches!(err, LibraryError::ReservedName(ref name) if name == "forest"));
    assert!(err.is_recoverable());
    assert_eq!(
        home.library.store().list_assets(AssetCategory::Ambient).unwrap(),
        before
    );
}

#[test]
fn scenario_d_rename_follows_alarm_binding() {
    let home = home(&[], &[], &[]);
    let sounds_dir = home.paths.user_sounds_dir();
    write_audio(&sounds_dir.join("bell.wav"));
    home.config
        .update_role_binding(Role::Alarm, "bell.wav", &sounds_dir)
        .unwrap();

    home.library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "bell", "gong")
        .unwrap();

    assert_eq!(
        home.config.get_role_binding(Role::Alarm).unwrap(),
        RoleBinding::new("gong.wav", &sounds_dir)
    );
    assert!(home.library.role_file(Role::Alarm).unwrap().is_file());
}

#[test]
fn scenario_e_remove_resets_ambient_binding() {
    let home = home(&[], &["rain.wav"], &[]);
    let ambiences_dir = home.paths.user_ambiences_dir();
    write_audio(&ambiences_dir.join("loop.wav"));
    home.config
        .update_role_binding(Role::Ambient, "loop.wav", &ambiences_dir)
        .unwrap();

    home.library
        .remove_asset(AssetCategory::Ambient, AssetLocation::User, "loop")
        .unwrap();

    assert_eq!(
        home.config.get_role_binding(Role::Ambient).unwrap(),
        *home.config.fallback(Role::Ambient).unwrap()
    );
    assert!(!home
        .library
        .store()
        .list_assets(AssetCategory::Ambient)
        .unwrap()
        .contains(&"loop".to_string()));
    assert!(home.library.role_file(Role::Ambient).unwrap().is_file());
}

#[test]
fn uniqueness_holds_across_imports_and_renames() {
    let home = home(&["bell.wav", "chime.ogg"], &["rain.wav"], &["alarm", "signal", "rain"]);

    let attempts = [
        ("bell.mp3", AssetCategory::Sound),
        ("Wind Chimes.flac", AssetCategory::Sound),
        ("wind-chimes.wav", AssetCategory::Sound),
        ("Wind_Chimes.ogg", AssetCategory::Sound),
        ("rain.ogg", AssetCategory::Ambient),
        ("waves.opus", AssetCategory::Ambient),
        ("bell.wav", AssetCategory::Ambient),
    ];
    for (file_name, category) in attempts {
        let source = incoming(&home, file_name);
        let _ = home.library.import_asset(category, &source);
        assert_unique(&home, category);
    }

    let renames = [
        (AssetCategory::Sound, "wind-chimes", "chime"),
        (AssetCategory::Sound, "Wind_Chimes", "wind-chimes"),
        (AssetCategory::Sound, "wind-chimes", "breeze"),
        (AssetCategory::Ambient, "waves", "bell"),
        (AssetCategory::Ambient, "waves", "surf"),
    ];
    for (category, old, new) in renames {
        let _ = home
            .library
            .rename_asset(category, AssetLocation::User, old, new);
        assert_unique(&home, category);
    }

    // Same base name in different categories is allowed
    let ambient = home.library.store().list_assets(AssetCategory::Ambient).unwrap();
    assert_eq!(ambient, vec!["bell", "rain", "surf"]);
}

#[test]
fn reserved_names_never_touch_disk() {
    let home = home(&[], &[], &["alarm", "forest"]);
    write_audio(&home.paths.user_sounds_dir().join("horn.wav"));
    let before_sounds = dir_listing(&home.paths.user_sounds_dir());
    let before_ambiences = dir_listing(&home.paths.user_ambiences_dir());

    for file_name in ["alarm.wav", "Forest.ogg", "forest.mp3"] {
        let source = incoming(&home, file_name);
        let result = home.library.import_asset(AssetCategory::Ambient, &source);
        if file_name == "Forest.ogg" {
            // Case-sensitive: "Forest" is not reserved
            assert!(result.is_ok());
            fs::remove_file(home.paths.user_ambiences_dir().join("Forest.ogg")).unwrap();
        } else {
            assert!(matches!(result, Err(LibraryError::ReservedName(_))));
        }
    }
    for new_name in ["alarm", "forest"] {
        for location in [AssetLocation::User, AssetLocation::BuiltIn] {
            let err = home
                .library
                .rename_asset(AssetCategory::Sound, location, "horn", new_name)
                .unwrap_err();
            assert!(matches!(err, LibraryError::ReservedName(_)));
        }
    }

    assert_eq!(dir_listing(&home.paths.user_sounds_dir()), before_sounds);
    assert_eq!(dir_listing(&home.paths.user_ambiences_dir()), before_ambiences);
}

#[test]
fn bindings_follow_every_rename_and_removal() {
    let home = home(&["alarm.wav", "signal.wav"], &["rain.wav"], &[]);
    write_audio(&home.paths.user_sounds_dir().join("bell.wav"));
    write_audio(&home.paths.user_ambiences_dir().join("cafe.flac"));

    home.library.assign_role(Role::Alarm, "bell").unwrap();
    home.library.assign_role(Role::Signal, "bell").unwrap();
    home.library.assign_role(Role::Ambient, "cafe").unwrap();

    home.library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "bell", "gong")
        .unwrap();
    home.library
        .rename_asset(AssetCategory::Ambient, AssetLocation::User, "cafe", "bistro")
        .unwrap();
    assert_eq!(home.config.get_role_binding(Role::Alarm).unwrap().name, "gong.wav");
    assert_eq!(home.config.get_role_binding(Role::Signal).unwrap().name, "gong.wav");
    assert_eq!(
        home.config.get_role_binding(Role::Ambient).unwrap().name,
        "bistro.flac"
    );

    home.library
        .remove_asset(AssetCategory::Sound, AssetLocation::User, "gong")
        .unwrap();
    home.library
        .remove_asset(AssetCategory::Ambient, AssetLocation::User, "bistro")
        .unwrap();

    for role in Role::ALL {
        let binding = home.config.get_role_binding(role).unwrap();
        assert_eq!(&binding, home.config.fallback(role).unwrap());
        assert!(binding.file_path().is_file(), "{role} points at a missing file");
    }
}

#[test]
fn bindings_survive_restart() {
    let home = home(&[], &[], &[]);
    write_audio(&home.paths.user_sounds_dir().join("bell.wav"));
    home.library.assign_role(Role::Alarm, "bell").unwrap();
    home.library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "bell", "gong")
        .unwrap();

    let reopened = ConfigStore::for_paths(&home.paths).unwrap();
    assert_eq!(
        reopened.get_role_binding(Role::Alarm).unwrap(),
        RoleBinding::new("gong.wav", home.paths.user_sounds_dir())
    );
}

/// Replace the role record directory with a plain file so every write fails
fn break_config_dir(home: &Home) {
    let dir = home.paths.config_dir();
    fs::remove_dir_all(&dir).unwrap();
    fs::write(&dir, b"not a directory").unwrap();
}

#[test]
fn failed_binding_write_rolls_back_rename() {
    let home = home(&["alarm.wav", "signal.wav"], &[], &[]);
    let sounds_dir = home.paths.user_sounds_dir();
    write_audio(&sounds_dir.join("bell.wav"));
    home.library.assign_role(Role::Alarm, "bell").unwrap();
    break_config_dir(&home);

    let err = home
        .library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "bell", "gong")
        .unwrap_err();

    assert!(matches!(err, LibraryError::Config(_)));
    assert!(!err.is_recoverable());
    assert_eq!(dir_listing(&sounds_dir), vec!["bell.wav"]);
    let binding = home.config.get_role_binding(Role::Alarm).unwrap();
    assert_eq!(binding, RoleBinding::new("bell.wav", &sounds_dir));
    assert!(binding.file_path().is_file());
}

#[test]
fn failed_binding_write_rolls_back_remove() {
    let home = home(&[], &["rain.wav"], &[]);
    let ambiences_dir = home.paths.user_ambiences_dir();
    write_audio(&ambiences_dir.join("loop.wav"));
    home.library.assign_role(Role::Ambient, "loop").unwrap();
    break_config_dir(&home);

    let err = home
        .library
        .remove_asset(AssetCategory::Ambient, AssetLocation::User, "loop")
        .unwrap_err();

    assert!(matches!(err, LibraryError::Config(_)));
    assert_eq!(dir_listing(&ambiences_dir), vec!["loop.wav"]);
    assert!(home.library.role_file(Role::Ambient).unwrap().is_file());
    assert!(home
        .library
        .store()
        .list_assets(AssetCategory::Ambient)
        .unwrap()
        .contains(&"loop".to_string()));
}

#[test]
fn unbound_assets_need_no_binding_write() {
    let home = home(&[], &[], &[]);
    write_audio(&home.paths.user_sounds_dir().join("horn.wav"));
    break_config_dir(&home);

    home.library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "horn", "siren")
        .unwrap();
    home.library
        .remove_asset(AssetCategory::Sound, AssetLocation::User, "siren")
        .unwrap();
    assert!(dir_listing(&home.paths.user_sounds_dir()).is_empty());
}

#[test]
fn external_removal_surfaces_as_not_found() {
    let home = home(&[], &[], &[]);
    let path = home.paths.user_sounds_dir().join("bell.wav");
    write_audio(&path);
    let asset = home
        .library
        .store()
        .resolve(AssetCategory::Sound, "bell")
        .unwrap();
    fs::remove_file(&path).unwrap();

    let err = home
        .library
        .rename_asset(asset.category, asset.location, "bell", "gong")
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound(_)));
    let err = home
        .library
        .remove_asset(asset.category, asset.location, "bell")
        .unwrap_err();
    assert!(matches!(err, LibraryError::NotFound(_)));
}

#[test]
fn library_events_describe_mutations() {
    let home = home(&[], &[], &[]);
    let bus = EventBus::new();
    let (rx, _id) = bus.subscribe();
    let library = SoundLibrary::new(home.library.store().clone(), Arc::clone(&home.config))
        .with_event_bus(bus);

    let source = incoming(&home, "Bird Song.mp3");
    library.import_asset(AssetCategory::Sound, &source).unwrap();
    library
        .rename_asset(AssetCategory::Sound, AssetLocation::User, "Bird_Song", "birds")
        .unwrap();

    let events: Vec<LibraryEvent> = rx.try_iter().collect();
    assert_eq!(
        events,
        vec![
            LibraryEvent::AssetImported {
                category: AssetCategory::Sound,
                name: "Bird_Song".to_string(),
            },
            LibraryEvent::AssetRenamed {
                category: AssetCategory::Sound,
                old_name: "Bird_Song".to_string(),
                new_name: "birds".to_string(),
            },
        ]
    );
}

// Playback

#[derive(Default)]
struct Log {
    events: Mutex<Vec<String>>,
    live: AtomicUsize,
}

struct LoggedVoice {
    name: String,
    log: Arc<Log>,
    playing: bool,
}

impl Voice for LoggedVoice {
    fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            self.log.events.lock().push(format!("stop {}", self.name));
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
    }
}

impl Drop for LoggedVoice {
    fn drop(&mut self) {
        self.stop();
        self.log.live.fetch_sub(1, Ordering::SeqCst);
    }
}

struct LoggingBackend {
    log: Arc<Log>,
}

impl AudioBackend for LoggingBackend {
    fn start(&self, path: &Path, options: VoiceOptions) -> Result<Box<dyn Voice>, PlaybackError> {
        let name = path.file_stem().unwrap().to_string_lossy().to_string();
        self.log.live.fetch_add(1, Ordering::SeqCst);
        self.log
            .events
            .lock()
            .push(format!("start {name}{}", if options.looped { " (loop)" } else { "" }));
        Ok(Box::new(LoggedVoice {
            name,
            log: Arc::clone(&self.log),
            playing: true,
        }))
    }
}

fn controller(home: &Home) -> (PlaybackController, Arc<Log>) {
    let log = Arc::new(Log::default());
    let backend = LoggingBackend {
        log: Arc::clone(&log),
    };
    let controller = PlaybackController::new(home.library.store().clone(), Box::new(backend));
    (controller, log)
}

#[test]
fn preview_stops_previous_before_starting_next() {
    let home = home(&["bell.wav"], &["rain.wav"], &[]);
    let (controller, log) = controller(&home);

    controller.preview("bell").unwrap();
    controller.preview("rain").unwrap();
    controller.stop_all();

    assert_eq!(
        *log.events.lock(),
        vec!["start bell", "stop bell", "start rain", "stop rain"]
    );
    assert!(!controller.is_previewing());
    assert_eq!(log.live.load(Ordering::SeqCst), 0);
}

#[test]
fn preview_prefers_sound_pool() {
    let home = home(&[], &["bell.wav"], &[]);
    write_audio(&home.paths.user_sounds_dir().join("bell.ogg"));
    let (controller, _log) = controller(&home);

    let asset = controller.preview("bell").unwrap();
    assert_eq!(asset.category, AssetCategory::Sound);
    assert_eq!(asset.path, home.paths.user_sounds_dir().join("bell.ogg"));
}

#[test]
fn stop_all_twice_is_harmless() {
    let home = home(&["bell.wav"], &[], &[]);
    let (controller, log) = controller(&home);

    controller.stop_all();
    controller.preview("bell").unwrap();
    controller.stop_all();
    controller.stop_all();

    assert_eq!(*log.events.lock(), vec!["start bell", "stop bell"]);
}

#[test]
fn ambient_role_loops_beside_preview() {
    let home = home(&["bell.wav"], &["rain.wav"], &[]);
    let (controller, log) = controller(&home);
    let ambient = home.config.get_role_binding(Role::Ambient).unwrap();

    controller.play_role(Role::Ambient, &ambient).unwrap();
    controller.preview("bell").unwrap();
    controller.preview("bell").unwrap();

    assert_eq!(
        *log.events.lock(),
        vec!["start rain (loop)", "start bell", "stop bell", "start bell"]
    );
    controller.stop_all();
    assert_eq!(log.live.load(Ordering::SeqCst), 0);
}
