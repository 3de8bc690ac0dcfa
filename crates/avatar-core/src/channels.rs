//! Morph-target channel maps and the flat registry the compositor walks.
//!
//! A [`MorphTarget`] mirrors what a skinned sub-mesh exposes: a dictionary
//! from channel name to slot index plus a parallel influence array. The
//! registry is filled once when the mesh is loaded so the per-tick code never
//! has to traverse a scene graph.

use fnv::FnvHashMap;

#[derive(Clone, Debug, Default)]
pub struct MorphTarget {
    pub label: String,
    names: Vec<String>,
    dictionary: FnvHashMap<String, usize>,
    influences: Vec<f32>,
}

impl MorphTarget {
    pub fn new<I, S>(label: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let mut dictionary = FnvHashMap::default();
        for (i, name) in names.iter().enumerate() {
            dictionary.insert(name.clone(), i);
        }
        let influences = vec![0.0; names.len()];
        Self {
            label: label.into(),
            names,
            dictionary,
            influences,
        }
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.dictionary.get(name).copied()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.dictionary.contains_key(name)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<f32> {
        self.index_of(name).map(|i| self.influences[i])
    }

    /// Write `value` into the named channel. Returns false when the mesh has
    /// no such channel; that is never an error.
    #[inline]
    pub fn set(&mut self, name: &str, value: f32) -> bool {
        match self.index_of(name) {
            Some(i) => {
                self.influences[i] = value;
                true
            }
            None => false,
        }
    }

    #[inline]
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut f32> {
        self.influences.get_mut(index)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn influences(&self) -> &[f32] {
        &self.influences
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Clone, Debug, Default)]
pub struct MorphTargetRegistry {
    targets: Vec<MorphTarget>,
}

impl MorphTargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel-bearing target and return its slot. Targets without
    /// channels are accepted but never influence anything.
    pub fn register(&mut self, target: MorphTarget) -> usize {
        self.targets.push(target);
        self.targets.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&MorphTarget> {
        self.targets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MorphTarget> {
        self.targets.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, MorphTarget> {
        self.targets.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl FromIterator<MorphTarget> for MorphTargetRegistry {
    fn from_iter<T: IntoIterator<Item = MorphTarget>>(iter: T) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}
