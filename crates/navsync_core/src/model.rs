use serde::{Deserialize, Serialize};

/// Cache key under which the last synchronized snapshot is stored.
pub const SNAPSHOT_KEY: &str = "navsync_data";

/// A saved link as returned by the storage endpoint.
///
/// `category_id` is not validated against the category list; links with a
/// dangling id are listed in a trailing "Uncategorized" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
    #[serde(default)]
    pub created_at: i64,
}

impl Link {
    /// True when the link has no usable description.
    pub fn is_missing_description(&self) -> bool {
        self.description
            .as_deref()
            .map_or(true, |text| text.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// The full `{links, categories}` dataset. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CachedSnapshot {
    #[serde(default)]
    pub links: Vec<Link>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl CachedSnapshot {
    pub fn new(links: Vec<Link>, categories: Vec<Category>) -> Self {
        Self { links, categories }
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.categories.is_empty()
    }

    /// Returns a new snapshot with `links` swapped in and categories kept.
    pub fn with_links(&self, links: Vec<Link>) -> Self {
        Self {
            links,
            categories: self.categories.clone(),
        }
    }
}

/// Copy of `links` where only the link with `link_id` has its description
/// replaced. Order is preserved; an unknown id yields an unchanged copy.
pub fn with_description(links: &[Link], link_id: &str, description: &str) -> Vec<Link> {
    links
        .iter()
        .map(|link| {
            if link.id == link_id {
                Link {
                    description: Some(description.to_string()),
                    ..link.clone()
                }
            } else {
                link.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(id: &str, description: Option<&str>) -> Link {
        Link {
            id: id.to_string(),
            title: format!("title {id}"),
            url: format!("https://{id}.example.com"),
            description: description.map(str::to_string),
            category_id: "c1".to_string(),
            icon: None,
            pinned: None,
            created_at: 0,
        }
    }

    #[test]
    fn blank_description_counts_as_missing() {
        assert!(link("a", None).is_missing_description());
        assert!(link("a", Some("   ")).is_missing_description());
        assert!(!link("a", Some("docs")).is_missing_description());
    }

    #[test]
    fn with_description_touches_only_the_target() {
        let links = vec![link("a", None), link("b", None), link("c", Some("kept"))];
        let updated = with_description(&links, "b", "fresh");

        assert_eq!(updated.len(), 3);
        assert_eq!(updated[0], links[0]);
        assert_eq!(updated[1].description.as_deref(), Some("fresh"));
        assert_eq!(updated[2], links[2]);
        // Source list is untouched.
        assert_eq!(links[1].description, None);
    }

    #[test]
    fn snapshot_decodes_camel_case_and_missing_arrays() {
        let json = r#"{"links":[{"id":"1","title":"A","url":"http://a","categoryId":"c1","createdAt":17}]}"#;
        let snapshot: CachedSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.links[0].category_id, "c1");
        assert_eq!(snapshot.links[0].created_at, 17);
        assert!(snapshot.categories.is_empty());
    }
}
