// Synchronous state actions. No backend calls.

use super::SitesStore;
use crate::models::Site;

impl SitesStore {
    pub fn sites(&self) -> Vec<Site> {
        self.state.read().sites.clone()
    }

    pub fn site(&self, identifier: &str) -> Option<Site> {
        self.state
            .read()
            .sites
            .iter()
            .find(|s| s.identifier == identifier)
            .cloned()
    }

    /// Adds a site; a site with the same identifier is replaced in place.
    pub fn add_site(&self, site: Site) {
        let mut state = self.state.write();
        match state
            .sites
            .iter()
            .position(|s| s.identifier == site.identifier)
        {
            Some(i) => state.sites[i] = site,
            None => state.sites.push(site),
        }
    }

    /// Replaces the stored site with the same identifier. Returns false if absent.
    pub fn update_site_locally(&self, site: Site) -> bool {
        let mut state = self.state.write();
        match state
            .sites
            .iter_mut()
            .find(|s| s.identifier == site.identifier)
        {
            Some(existing) => {
                *existing = site;
                true
            }
            None => false,
        }
    }

    /// Removes the site and any selection that referenced it.
    pub fn remove_site(&self, identifier: &str) {
        let mut state = self.state.write();
        state.sites.retain(|s| s.identifier != identifier);
        if state.selected_site_identifier.as_deref() == Some(identifier) {
            state.selected_site_identifier = None;
        }
        state.selected_monitor_ids.remove(identifier);
    }

    pub fn set_sites(&self, sites: Vec<Site>) {
        self.state.write().sites = sites;
    }

    pub fn select_site(&self, identifier: Option<&str>) {
        self.state.write().selected_site_identifier = identifier.map(str::to_string);
    }

    pub fn selected_site(&self) -> Option<Site> {
        let state = self.state.read();
        let selected = state.selected_site_identifier.as_deref()?;
        state
            .sites
            .iter()
            .find(|s| s.identifier == selected)
            .cloned()
    }

    pub fn set_selected_monitor_id(&self, site_identifier: &str, monitor_id: &str) {
        self.state
            .write()
            .selected_monitor_ids
            .insert(site_identifier.to_string(), monitor_id.to_string());
    }

    pub fn selected_monitor_id(&self, site_identifier: &str) -> Option<String> {
        self.state
            .read()
            .selected_monitor_ids
            .get(site_identifier)
            .cloned()
    }
}
