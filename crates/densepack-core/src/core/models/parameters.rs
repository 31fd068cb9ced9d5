/// Ordered assignment of free-parameter values to Wyckoff sites.
///
/// Insertion order is the order in which seeds are placed by the orbit expansion. Setting an
/// already present site replaces its values in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationParameters {
    entries: Vec<(String, Vec<f64>)>,
}

impl GenerationParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, site: &str, values: Vec<f64>) -> Self {
        self.set(site, values);
        self
    }

    pub fn set(&mut self, site: &str, values: Vec<f64>) {
        match self.entries.iter_mut().find(|(name, _)| name == site) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((site.to_string(), values)),
        }
    }

    /// Overwrites one value; returns `false` if the site or index does not exist.
    pub fn set_value(&mut self, site: &str, index: usize, value: f64) -> bool {
        self.entries
            .iter_mut()
            .find(|(name, _)| name == site)
            .and_then(|(_, values)| values.get_mut(index))
            .map(|slot| *slot = value)
            .is_some()
    }

    pub fn get(&self, site: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(name, _)| name == site)
            .map(|(_, values)| values.as_slice())
    }

    pub fn contains(&self, site: &str) -> bool {
        self.get(site).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn sites(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<f64>)> for GenerationParameters {
    fn from_iter<I: IntoIterator<Item = (S, Vec<f64>)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (site, values) in iter {
            let site: String = site.into();
            params.set(&site, values);
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insertion_order_is_preserved() {
        let params = GenerationParameters::new()
            .with("e", vec![0.1])
            .with("b", vec![])
            .with("c", vec![]);
        assert_eq!(params.sites().collect::<Vec<_>>(), vec!["e", "b", "c"]);
    }

    #[test]
    fn set_replaces_existing_entry_without_reordering() {
        let mut params = GenerationParameters::new()
            .with("b", vec![])
            .with("e", vec![0.1]);
        params.set("b", vec![]);
        params.set("e", vec![0.3]);
        assert_eq!(params.len(), 2);
        assert_eq!(params.sites().collect::<Vec<_>>(), vec!["b", "e"]);
        assert_eq!(params.get("e"), Some(&[0.3][..]));
    }

    #[test]
    fn set_value_updates_a_single_slot() {
        let mut params = GenerationParameters::new().with("h", vec![0.1, 0.2]);
        assert!(params.set_value("h", 1, 0.7));
        assert_eq!(params.get("h"), Some(&[0.1, 0.7][..]));
    }

    #[test]
    fn set_value_reports_missing_site_or_index() {
        let mut params = GenerationParameters::new().with("e", vec![0.1]);
        assert!(!params.set_value("e", 1, 0.5));
        assert!(!params.set_value("x", 0, 0.5));
        assert_eq!(params.get("e"), Some(&[0.1][..]));
    }

    #[test]
    fn collects_from_tuples() {
        let params: GenerationParameters =
            vec![("b", vec![]), ("e", vec![0.25])].into_iter().collect();
        assert!(params.contains("b"));
        assert_eq!(params.get("e"), Some(&[0.25][..]));
        assert!(!params.is_empty());
    }
}
