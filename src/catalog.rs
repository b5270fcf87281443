//! Hard-coded project/skill catalog served by the read-only API.
//!
//! This is content, not state: it ships with the binary and is returned
//! verbatim, so there is nothing to persist or invalidate.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static [&'static str],
    pub tech_stack: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github_url: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_url: Option<&'static str>,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Skill {
    pub name: &'static str,
    pub proficiency: u8,
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGroups {
    pub languages: &'static [Skill],
    pub tools: &'static [Skill],
    pub frameworks: &'static [Skill],
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub projects_count: usize,
    pub technologies_count: usize,
    pub skills_count: usize,
    pub categories: BTreeMap<&'static str, usize>,
}

pub static PROJECTS: &[Project] = &[
    Project {
        id: "news-verifier",
        title: "News Verifier Browser Extension",
        description: "Browser extension that scores news articles in real time, \
                      combining local text analysis with a verification backend.",
        category: &["ai", "extension"],
        tech_stack: &["WebExtension API", "Python", "NLP"],
        github_url: Some("https://github.com/example/news-verifier"),
        live_url: None,
        icon: "fas fa-shield-alt",
    },
    Project {
        id: "film-finder",
        title: "Film Finder Recommendation Engine",
        description: "Content-based movie recommendations using cosine similarity \
                      over stemmed plot descriptions.",
        category: &["ai", "web"],
        tech_stack: &["Python", "Streamlit", "NLP", "TMDB API"],
        github_url: Some("https://github.com/example/film-finder"),
        live_url: None,
        icon: "fas fa-film",
    },
    Project {
        id: "doc-chat",
        title: "Document Chat Assistant",
        description: "Chat with uploaded PDFs through a retrieval-augmented \
                      pipeline with semantic search over embedded pages.",
        category: &["ai", "web"],
        tech_stack: &["Python", "LangChain", "FAISS"],
        github_url: Some("https://github.com/example/doc-chat"),
        live_url: Some("https://doc-chat.example.com"),
        icon: "fas fa-file-pdf",
    },
    Project {
        id: "cell-counter",
        title: "Blood Cell Detection System",
        description: "Real-time identification and counting of blood cell types \
                      in microscope imagery with a YOLO detector.",
        category: &["ai", "web"],
        tech_stack: &["Python", "YOLO", "OpenCV", "Plotly"],
        github_url: Some("https://github.com/example/cell-counter"),
        live_url: None,
        icon: "fas fa-microscope",
    },
    Project {
        id: "resume-matcher",
        title: "Resume–Job Description Matcher",
        description: "Scores resumes against job postings and suggests concrete \
                      upskilling paths for the gaps it finds.",
        category: &["ai", "web"],
        tech_stack: &["Flask", "FAISS", "SQLite", "Chart.js"],
        github_url: Some("https://github.com/example/resume-matcher"),
        live_url: Some("https://resume-matcher.example.com"),
        icon: "fas fa-user-tie",
    },
    Project {
        id: "storybook-studio",
        title: "Storybook Studio",
        description: "Generates illustrated five-page children's storybooks with \
                      narration and downloadable PDF output.",
        category: &["ai", "web"],
        tech_stack: &["Flask", "Text-to-Speech", "PDF Generation"],
        github_url: Some("https://github.com/example/storybook-studio"),
        live_url: None,
        icon: "fas fa-book-open",
    },
];

pub static SKILLS: SkillGroups = SkillGroups {
    languages: &[
        Skill { name: "Python", proficiency: 90, icon: "fab fa-python" },
        Skill { name: "Rust", proficiency: 85, icon: "fab fa-rust" },
        Skill { name: "JavaScript", proficiency: 85, icon: "fab fa-js-square" },
        Skill { name: "HTML/CSS", proficiency: 95, icon: "fab fa-html5" },
    ],
    tools: &[
        Skill { name: "VS Code", proficiency: 90, icon: "fas fa-code" },
        Skill { name: "Docker", proficiency: 80, icon: "fab fa-docker" },
        Skill { name: "Postman", proficiency: 85, icon: "fas fa-tools" },
    ],
    frameworks: &[
        Skill { name: "Flask", proficiency: 85, icon: "fas fa-flask" },
        Skill { name: "NumPy", proficiency: 85, icon: "fas fa-chart-line" },
        Skill { name: "Pandas", proficiency: 80, icon: "fas fa-table" },
        Skill { name: "Scikit-Learn", proficiency: 85, icon: "fas fa-brain" },
        Skill { name: "LangChain", proficiency: 75, icon: "fas fa-link" },
    ],
};

pub static STATS: LazyLock<CatalogStats> = LazyLock::new(|| {
    let technologies: BTreeSet<&str> = PROJECTS
        .iter()
        .flat_map(|p| p.tech_stack.iter().copied())
        .collect();

    let mut categories: BTreeMap<&'static str, usize> = BTreeMap::new();
    for project in PROJECTS {
        for category in project.category {
            *categories.entry(category).or_default() += 1;
        }
    }

    CatalogStats {
        projects_count: PROJECTS.len(),
        technologies_count: technologies.len(),
        skills_count: SKILLS.languages.len() + SKILLS.tools.len() + SKILLS.frameworks.len(),
        categories,
    }
});

pub fn project_by_id(id: &str) -> Option<&'static Project> {
    PROJECTS.iter().find(|p| p.id == id)
}

pub fn projects_in_category(category: &str) -> Vec<&'static Project> {
    PROJECTS
        .iter()
        .filter(|p| p.category.contains(&category))
        .collect()
}

pub fn skills_in_category(category: &str) -> Option<&'static [Skill]> {
    match category {
        "languages" => Some(SKILLS.languages),
        "tools" => Some(SKILLS.tools),
        "frameworks" => Some(SKILLS.frameworks),
        _ => None,
    }
}
