// File: ./src/model/link.rs
use serde::{Deserialize, Serialize};

pub const REGISTRATION: &str = "Anmeldung";
pub const REGISTRATION_WITH_RESULTS: &str = "Anmeldung / Ergebnisse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinkKind {
    Normal,
    Email,
    Registration,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub url: String,
    pub kind: LinkKind,
}

impl Link {
    pub fn new(name: &str, url: &str) -> Self {
        let name = name.trim();
        let url = url.trim();
        let kind = if url.starts_with("mailto:") {
            LinkKind::Email
        } else if name == REGISTRATION {
            LinkKind::Registration
        } else if url.starts_with("http://") || url.starts_with("https://") {
            LinkKind::External
        } else {
            LinkKind::Normal
        };
        Self {
            name: name.to_string(),
            url: url.to_string(),
            kind,
        }
    }

    pub fn unnamed(url: &str) -> Self {
        Self::new("", url)
    }

    pub fn is_email(&self) -> bool {
        self.kind == LinkKind::Email
    }

    pub fn is_registration(&self) -> bool {
        self.kind == LinkKind::Registration
    }

    /// Points to another website (registration pages included).
    pub fn is_external(&self) -> bool {
        self.url.starts_with("http://") || self.url.starts_with("https://")
    }
}

/// `name|url` cells plus an optional registration URL to the link list.
/// The registration link comes first; a duplicate named registration link is
/// dropped.
pub fn parse_links(cells: &[String], registration: &str) -> anyhow::Result<Vec<Link>> {
    let mut links = Vec::with_capacity(cells.len() + 1);
    let has_registration = !registration.trim().is_empty();
    if has_registration {
        links.push(Link::new(REGISTRATION, registration));
    }
    for cell in cells {
        if cell.is_empty() {
            continue;
        }
        let parts: Vec<&str> = cell.split('|').collect();
        if parts.len() != 2 {
            anyhow::bail!("bad link: <{}>", cell);
        }
        if !has_registration || parts[0].trim() != REGISTRATION {
            links.push(Link::new(parts[0], parts[1]));
        }
    }
    Ok(links)
}
