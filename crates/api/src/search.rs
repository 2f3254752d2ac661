//! Ranked employee search.
//!
//! Matching runs over the in-memory employee list in tiers, highest
//! priority first: acronym-dictionary hits, multi-word acronym hits,
//! title initialisms, plain substrings, and finally weighted
//! edit-distance matches. Tiers are concatenated and deduplicated by
//! id, so an employee keeps the position of its best tier.

use std::collections::{HashMap, HashSet};

use entity::employee;
use uuid::Uuid;

const NAME_WEIGHT: f64 = 0.4;
const TITLE_WEIGHT: f64 = 0.3;
const EMAIL_WEIGHT: f64 = 0.2;
const DEPARTMENT_WEIGHT: f64 = 0.1;

/// Normalized-distance cutoffs; short queries get the lenient one.
const SHORT_QUERY_THRESHOLD: f64 = 0.6;
const DEFAULT_THRESHOLD: f64 = 0.4;
const SHORT_QUERY_LEN: usize = 3;

/// Token -> canonical title/department phrases. Injected configuration:
/// callers may load their own mapping; `Default` carries the built-in
/// table of common role abbreviations.
#[derive(Clone, Debug)]
pub struct AcronymDictionary {
    entries: HashMap<String, Vec<String>>,
}

impl AcronymDictionary {
    pub fn from_entries(entries: HashMap<String, Vec<String>>) -> Self {
        let entries = entries
            .into_iter()
            .map(|(token, phrases)| (token.to_uppercase(), phrases))
            .collect();
        Self { entries }
    }

    /// Parse a `{"TOKEN": ["Phrase", ...]}` JSON document.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let entries: HashMap<String, Vec<String>> = serde_json::from_str(raw)?;
        Ok(Self::from_entries(entries))
    }

    pub fn expansions(&self, token: &str) -> Option<&[String]> {
        self.entries
            .get(&token.to_uppercase())
            .map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for AcronymDictionary {
    fn default() -> Self {
        let entries = DEFAULT_ACRONYMS
            .iter()
            .map(|(token, phrases)| {
                (
                    (*token).to_string(),
                    phrases.iter().map(|p| (*p).to_string()).collect(),
                )
            })
            .collect();
        Self { entries }
    }
}

const DEFAULT_ACRONYMS: &[(&str, &[&str])] = &[
    ("SWE", &["Software Engineer", "Senior Software Engineer"]),
    ("SE", &["Software Engineer", "Senior Software Engineer"]),
    ("SSE", &["Senior Software Engineer"]),
    ("PM", &["Product Manager", "Project Manager"]),
    ("CEO", &["Chief Executive Officer"]),
    ("CTO", &["Chief Technology Officer"]),
    ("CFO", &["Chief Financial Officer"]),
    ("COO", &["Chief Operating Officer"]),
    (
        "HR",
        &[
            "Human Resources",
            "HR Specialist",
            "Director of Human Resources",
        ],
    ),
    ("EM", &["Engineering Manager"]),
    ("ENG", &["Engineering", "Engineering Manager"]),
    ("FIN", &["Finance", "Finance Manager", "Financial"]),
    ("FM", &["Finance Manager"]),
    ("FA", &["Financial Analyst"]),
    ("DEV", &["Developer", "Software Developer"]),
    ("QA", &["Quality Assurance", "QA Engineer"]),
    ("UX", &["UX Designer", "User Experience Designer"]),
    ("UI", &["UI Designer", "User Interface Designer"]),
    ("DS", &["Data Scientist"]),
    ("ML", &["Machine Learning Engineer"]),
    ("SRE", &["Site Reliability Engineer"]),
    ("DBA", &["Database Administrator"]),
    ("SA", &["System Administrator"]),
    ("BA", &["Business Analyst"]),
    ("SM", &["Scrum Master"]),
    ("PO", &["Product Owner"]),
    ("VP", &["Vice President"]),
    ("DIR", &["Director"]),
    (
        "MGR",
        &[
            "Manager",
            "Engineering Manager",
            "Finance Manager",
            "Product Manager",
            "Project Manager",
        ],
    ),
    ("LEAD", &["Lead", "Team Lead", "Tech Lead"]),
    (
        "ARCH",
        &["Architect", "Software Architect", "Solution Architect"],
    ),
    ("CONS", &["Consultant", "Senior Consultant"]),
    ("SPEC", &["Specialist"]),
    ("COORD", &["Coordinator"]),
    ("SUPER", &["Supervisor"]),
    ("EXEC", &["Executive"]),
    ("ADMIN", &["Administrator"]),
    ("ANALYST", &["Analyst"]),
    ("DESIGNER", &["Designer"]),
    ("WRITER", &["Writer", "Technical Writer"]),
    ("SUPPORT", &["Support", "Customer Support"]),
    ("SALES", &["Sales", "Sales Manager", "Account Manager"]),
    ("MARKETING", &["Marketing", "Marketing Manager"]),
    ("OPS", &["Operations", "Operations Manager"]),
    ("SEC", &["Security", "Security Engineer"]),
    ("COMPLIANCE", &["Compliance", "Compliance Officer"]),
    ("LEGAL", &["Legal", "Legal Counsel"]),
    ("COMMS", &["Communications", "Communications Manager"]),
    ("PR", &["Public Relations", "PR Manager"]),
];

/// Rank `employees` against a free-text query.
///
/// Blank queries return the input unchanged. Exact mode is a plain
/// case-insensitive substring filter over name, title, email, and
/// department. Fuzzy mode merges the tiers described in the module
/// docs; the input is never mutated and the result is deterministic
/// for a fixed dictionary.
pub fn rank(
    employees: &[employee::Model],
    query: &str,
    exact: bool,
    dictionary: &AcronymDictionary,
) -> Vec<employee::Model> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return employees.to_vec();
    }
    let needle = trimmed.to_lowercase();

    if exact {
        return employees
            .iter()
            .filter(|e| exact_match(e, &needle))
            .cloned()
            .collect();
    }

    let upper = trimmed.to_uppercase();
    let mut seen: HashSet<Uuid> = HashSet::new();
    let mut ranked: Vec<employee::Model> = Vec::new();

    for e in dictionary_hits(employees, &upper, dictionary) {
        push_unique(&mut ranked, &mut seen, e);
    }
    for e in multi_word_hits(employees, &upper, dictionary) {
        push_unique(&mut ranked, &mut seen, e);
    }
    for e in initialism_hits(employees, &needle) {
        push_unique(&mut ranked, &mut seen, e);
    }
    for e in title_or_name_hits(employees, &needle) {
        push_unique(&mut ranked, &mut seen, e);
    }
    for e in department_hits(employees, &needle) {
        push_unique(&mut ranked, &mut seen, e);
    }
    for e in fuzzy_hits(employees, &needle) {
        push_unique(&mut ranked, &mut seen, e);
    }

    ranked
}

fn push_unique(
    ranked: &mut Vec<employee::Model>,
    seen: &mut HashSet<Uuid>,
    candidate: &employee::Model,
) {
    if seen.insert(candidate.id) {
        ranked.push(candidate.clone());
    }
}

fn exact_match(e: &employee::Model, needle: &str) -> bool {
    e.name.to_lowercase().contains(needle)
        || e.title.to_lowercase().contains(needle)
        || e.email.to_lowercase().contains(needle)
        || e.department.to_lowercase().contains(needle)
}

/// Tier 1: the whole query resolves through the dictionary and one of
/// its canonical phrases appears in the title.
fn dictionary_hits<'a>(
    employees: &'a [employee::Model],
    upper: &str,
    dictionary: &AcronymDictionary,
) -> Vec<&'a employee::Model> {
    let Some(phrases) = dictionary.expansions(upper) else {
        return Vec::new();
    };
    let lowered: Vec<String> = phrases.iter().map(|p| p.to_lowercase()).collect();
    employees
        .iter()
        .filter(|e| {
            let title = e.title.to_lowercase();
            lowered.iter().any(|phrase| title.contains(phrase))
        })
        .collect()
}

/// Tier 2: every whitespace token resolves through the dictionary
/// against the title or the department ("VP ENG" -> Vice President in
/// Engineering).
fn multi_word_hits<'a>(
    employees: &'a [employee::Model],
    upper: &str,
    dictionary: &AcronymDictionary,
) -> Vec<&'a employee::Model> {
    let tokens: Vec<&str> = upper.split_whitespace().collect();
    if tokens.is_empty() {
        return Vec::new();
    }
    employees
        .iter()
        .filter(|e| {
            let title = e.title.to_lowercase();
            let department = e.department.to_lowercase();
            tokens.iter().all(|token| {
                dictionary.expansions(token).is_some_and(|phrases| {
                    phrases.iter().any(|phrase| {
                        let phrase = phrase.to_lowercase();
                        title.contains(&phrase) || department.contains(&phrase)
                    })
                })
            })
        })
        .collect()
}

/// Tier 3: the first letters of the title words contain the query
/// ("dohr" -> Director of Human Resources).
fn initialism_hits<'a>(
    employees: &'a [employee::Model],
    needle: &str,
) -> Vec<&'a employee::Model> {
    employees
        .iter()
        .filter(|e| {
            let initials: String = e
                .title
                .split_whitespace()
                .filter_map(|word| word.chars().next())
                .collect();
            initials.to_lowercase().contains(needle)
        })
        .collect()
}

fn title_or_name_hits<'a>(
    employees: &'a [employee::Model],
    needle: &str,
) -> Vec<&'a employee::Model> {
    employees
        .iter()
        .filter(|e| {
            e.title.to_lowercase().contains(needle) || e.name.to_lowercase().contains(needle)
        })
        .collect()
}

fn department_hits<'a>(
    employees: &'a [employee::Model],
    needle: &str,
) -> Vec<&'a employee::Model> {
    employees
        .iter()
        .filter(|e| e.department.to_lowercase().contains(needle))
        .collect()
}

/// Tier 6: approximate matches. A candidate qualifies when any field
/// comes within the edit-distance threshold; qualifying candidates are
/// ordered by the weighted blend across fields, ascending, stable on
/// ties.
fn fuzzy_hits<'a>(employees: &'a [employee::Model], needle: &str) -> Vec<&'a employee::Model> {
    let threshold = if needle.chars().count() <= SHORT_QUERY_LEN {
        SHORT_QUERY_THRESHOLD
    } else {
        DEFAULT_THRESHOLD
    };
    let mut scored: Vec<(usize, f64, &employee::Model)> = employees
        .iter()
        .enumerate()
        .filter_map(|(idx, e)| {
            let name = field_distance(needle, &e.name);
            let title = field_distance(needle, &e.title);
            let email = field_distance(needle, &e.email);
            let department = field_distance(needle, &e.department);
            let best = name.min(title).min(email).min(department);
            if best > threshold {
                return None;
            }
            let blended = NAME_WEIGHT * name
                + TITLE_WEIGHT * title
                + EMAIL_WEIGHT * email
                + DEPARTMENT_WEIGHT * department;
            Some((idx, blended, e))
        })
        .collect();
    scored.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal).then(a.0.cmp(&b.0)));
    scored.into_iter().map(|(_, _, e)| e).collect()
}

/// Best normalized distance between the query and the field: the whole
/// field, or any of its alphanumeric tokens. Substring containment
/// counts as a perfect match.
fn field_distance(needle: &str, text: &str) -> f64 {
    let hay = text.to_lowercase();
    if hay.contains(needle) {
        return 0.0;
    }
    let mut best = normalized_distance(needle, &hay);
    for token in hay.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        best = best.min(normalized_distance(needle, token));
    }
    best
}

fn normalized_distance(a: &str, b: &str) -> f64 {
    let longest = a.chars().count().max(b.chars().count());
    if longest == 0 {
        return 0.0;
    }
    levenshtein(a, b) as f64 / longest as f64
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            current[j + 1] = substitution.min(prev[j + 1] + 1).min(current[j] + 1);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}
