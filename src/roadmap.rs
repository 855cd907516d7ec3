use crate::models::Roadmap;

/// RoadmapCatalog
///
/// The learning-roadmap browser's data. Read-only.
#[derive(Debug, Clone, Default)]
pub struct RoadmapCatalog {
    roadmaps: Vec<Roadmap>,
}

impl RoadmapCatalog {
    pub fn new(roadmaps: Vec<Roadmap>) -> Self {
        Self { roadmaps }
    }

    pub fn all(&self) -> &[Roadmap] {
        &self.roadmaps
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for roadmap in &self.roadmaps {
            if !seen.contains(&roadmap.category.as_str()) {
                seen.push(&roadmap.category);
            }
        }
        seen
    }

    pub fn get(&self, id: &str) -> Option<&Roadmap> {
        self.roadmaps.iter().find(|r| r.id == id)
    }

    /// Filters by exact category (case-insensitive) and by a free-text query
    /// over title and description. Blank arguments do not filter.
    pub fn search(&self, category: Option<&str>, query: Option<&str>) -> Vec<&Roadmap> {
        let category = category.map(str::trim).filter(|c| !c.is_empty());
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        self.roadmaps
            .iter()
            .filter(|r| category.is_none_or(|c| r.category.eq_ignore_ascii_case(c)))
            .filter(|r| {
                query.as_deref().is_none_or(|q| {
                    r.title.to_lowercase().contains(q) || r.description.to_lowercase().contains(q)
                })
            })
            .collect()
    }
}
