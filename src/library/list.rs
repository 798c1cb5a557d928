use super::model::Track;

/// The loaded library plus the view the user currently sees.
///
/// `tracks` is the unfiltered snapshot. The view is a list of snapshot
/// indices and is always derived from the snapshot, so widening a query
/// brings back entries an earlier, narrower query hid.
#[derive(Debug, Default, Clone)]
pub struct TrackList {
    tracks: Vec<Track>,
    // Lowercase titles, parallel to `tracks`; filtering runs on every keystroke.
    lower_titles: Vec<String>,
    query: String,
    view: Vec<usize>,
}

impl TrackList {
    /// Replace the whole library, keeping the current query.
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.lower_titles = tracks.iter().map(|t| t.title.to_lowercase()).collect();
        self.tracks = tracks;
        self.refresh();
    }

    /// Set the filter query and recompute the view.
    ///
    /// An empty query shows the whole snapshot; anything else keeps the
    /// titles containing the query as typed, ignoring case. Spaces count.
    pub fn apply_filter(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_filtered(&self) -> bool {
        !self.query.is_empty()
    }

    fn refresh(&mut self) {
        let needle = self.query.to_lowercase();
        self.view = if needle.is_empty() {
            (0..self.tracks.len()).collect()
        } else {
            self.lower_titles
                .iter()
                .enumerate()
                .filter(|(_, title)| title.contains(&needle))
                .map(|(i, _)| i)
                .collect()
        };
    }

    /// The unfiltered snapshot.
    pub fn snapshot(&self) -> &[Track] {
        &self.tracks
    }

    /// Number of entries in the current view.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// True when the current view shows nothing (drives the empty-state text).
    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    /// Track at position `pos` of the current view.
    pub fn get(&self, pos: usize) -> Option<&Track> {
        self.view.get(pos).and_then(|&i| self.tracks.get(i))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> + '_ {
        self.view.iter().map(|&i| &self.tracks[i])
    }

    /// Owned copy of the current view, in order.
    pub fn visible(&self) -> Vec<Track> {
        self.iter().cloned().collect()
    }

    /// Remove the entry shown at view position `pos` from the snapshot.
    ///
    /// Removal targets that exact entry, so duplicates elsewhere in the
    /// library are left alone.
    pub fn remove_visible(&mut self, pos: usize) -> Option<Track> {
        let idx = *self.view.get(pos)?;
        self.lower_titles.remove(idx);
        let removed = self.tracks.remove(idx);
        self.refresh();
        Some(removed)
    }
}
