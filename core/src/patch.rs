//! Reversible style patches.
//!
//! Inline preview surfaces repurpose a card's image container as a
//! positioning context and hide its children. Every mutation goes through a
//! `VisualPatch` that captures the prior value of each touched property, so
//! restore puts the card back exactly as it was, without snapshotting opaque
//! style strings.

/// Style store a patch can read and write. Implemented for the real
/// `CssStyleDeclaration` in the shell and for a plain map in tests.
pub trait PatchSurface {
    /// Current value of an inline property, empty when unset.
    fn read(&self, prop: &str) -> String;

    /// Set a property; an empty value clears it.
    fn write(&mut self, prop: &str, value: &str);
}

#[derive(Clone, Debug)]
struct PatchEntry {
    prop: String,
    original: String,
}

#[derive(Clone, Debug, Default)]
pub struct VisualPatch {
    entries: Vec<PatchEntry>,
}

impl VisualPatch {
    /// Write `props` onto the surface, capturing each property's prior value.
    pub fn apply(surface: &mut dyn PatchSurface, props: &[(&str, String)]) -> Self {
        let entries = props
            .iter()
            .map(|(prop, value)| {
                let original = surface.read(prop);
                surface.write(prop, value);
                PatchEntry {
                    prop: (*prop).to_string(),
                    original,
                }
            })
            .collect();
        Self { entries }
    }

    /// Restore every captured property. Reverting twice writes the same
    /// originals again, so the call is idempotent.
    pub fn revert(&self, surface: &mut dyn PatchSurface) {
        for entry in &self.entries {
            surface.write(&entry.prop, &entry.original);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct FakeSurface {
        props: HashMap<String, String>,
    }

    impl PatchSurface for FakeSurface {
        fn read(&self, prop: &str) -> String {
            self.props.get(prop).cloned().unwrap_or_default()
        }

        fn write(&mut self, prop: &str, value: &str) {
            if value.is_empty() {
                self.props.remove(prop);
            } else {
                self.props.insert(prop.to_string(), value.to_string());
            }
        }
    }

    #[test]
    fn apply_then_revert_restores_originals() {
        let mut surface = FakeSurface::default();
        surface.write("position", "static");
        let patch = VisualPatch::apply(
            &mut surface,
            &[
                ("position", "relative".to_string()),
                ("overflow", "hidden".to_string()),
            ],
        );
        assert_eq!(surface.read("position"), "relative");
        assert_eq!(surface.read("overflow"), "hidden");

        patch.revert(&mut surface);
        assert_eq!(surface.read("position"), "static");
        assert_eq!(surface.read("overflow"), "");
    }

    #[test]
    fn revert_twice_is_idempotent() {
        let mut surface = FakeSurface::default();
        surface.write("width", "320px");
        let patch = VisualPatch::apply(&mut surface, &[("display", "none".to_string())]);
        patch.revert(&mut surface);
        let after_first = surface.props.clone();
        patch.revert(&mut surface);
        assert_eq!(surface.props, after_first);
        assert_eq!(surface.read("display"), "");
        assert_eq!(surface.read("width"), "320px");
    }
}
