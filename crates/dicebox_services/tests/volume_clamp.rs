use dicebox_services::{MemoryBackend, PreferenceKey, PreferenceStore, PreferenceValue};
use proptest::prelude::*;

proptest! {
    #[test]
    fn set_then_get_clamps_volume(v in -10.0f32..10.0) {
        let mut store = PreferenceStore::builder(MemoryBackend::new()).build();
        store.load();

        store.set(PreferenceKey::MusicVolume, v);
        prop_assert_eq!(store.get(PreferenceKey::MusicVolume), PreferenceValue::Volume(v.clamp(0.0, 1.0)));

        store.set(PreferenceKey::SfxVolume, v);
        prop_assert_eq!(store.sfx_volume(), v.clamp(0.0, 1.0));
    }

    #[test]
    fn in_domain_volumes_survive_reload(v in 0.0f32..=1.0) {
        let mut store = PreferenceStore::builder(MemoryBackend::new()).build();
        store.load();
        store.set(PreferenceKey::MusicVolume, v);
        store.save();

        let mut reloaded = PreferenceStore::builder(store.into_backend()).build();
        reloaded.load();
        prop_assert_eq!(reloaded.music_volume(), v);
    }
}

#[test]
fn infinite_volumes_clamp_to_bounds() {
    let mut store = PreferenceStore::builder(MemoryBackend::new()).build();
    store.load();

    store.set(PreferenceKey::MusicVolume, f32::INFINITY);
    assert_eq!(store.music_volume(), 1.0);
    store.set(PreferenceKey::MusicVolume, f32::NEG_INFINITY);
    assert_eq!(store.music_volume(), 0.0);
}
