//! Org-chart layout and manager-cycle prevention.
//!
//! The hierarchy is always derived from the flat employee list by
//! filtering on `manager_id`; nothing here keeps parent/child object
//! graphs around. The layout packs each subtree into a horizontal span
//! proportional to its width (a leaf is one unit, an internal node the
//! sum of its children) so sibling subtrees never overlap.

use std::collections::{HashMap, HashSet};

use entity::employee;
use uuid::Uuid;

/// Vertical distance between report levels, in canvas units.
pub const LEVEL_HEIGHT: f64 = 180.0;
/// Horizontal span of one leaf subtree, in canvas units.
pub const SUBTREE_UNIT: f64 = 260.0;

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: Uuid,
    pub level: u32,
    pub x: f64,
    pub y: f64,
    /// Width of the subtree rooted here, in leaf units.
    pub subtree_width: u32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ReportEdge {
    pub manager_id: Uuid,
    pub employee_id: Uuid,
}

#[derive(Clone, Debug, Default)]
pub struct OrgLayout {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<ReportEdge>,
}

/// Position every employee in the forest.
///
/// Roots are employees without a manager; an employee whose manager is
/// missing from the input is treated as a root rather than dropped.
/// Node order follows a depth-first walk from each root, roots in
/// input order.
pub fn layout(employees: &[employee::Model]) -> OrgLayout {
    let known: HashSet<Uuid> = employees.iter().map(|e| e.id).collect();
    let reports = reports_index(employees);

    let mut edges = Vec::new();
    for e in employees {
        if let Some(manager_id) = e.manager_id {
            if known.contains(&manager_id) {
                edges.push(ReportEdge {
                    manager_id,
                    employee_id: e.id,
                });
            }
        }
    }

    let roots: Vec<Uuid> = employees
        .iter()
        .filter(|e| match e.manager_id {
            None => true,
            Some(manager_id) => !known.contains(&manager_id),
        })
        .map(|e| e.id)
        .collect();

    let mut widths: HashMap<Uuid, u32> = HashMap::new();
    let mut in_progress: HashSet<Uuid> = HashSet::new();
    for root in &roots {
        subtree_width(*root, &reports, &mut widths, &mut in_progress);
    }

    let mut nodes = Vec::with_capacity(employees.len());
    let mut visited: HashSet<Uuid> = HashSet::new();
    let mut cursor = 0u32;
    for root in roots {
        let width = widths.get(&root).copied().unwrap_or(1);
        place(root, 0, cursor, &reports, &widths, &mut visited, &mut nodes);
        cursor += width;
    }

    OrgLayout { nodes, edges }
}

/// True iff assigning `proposed_manager_id` as the manager of
/// `employee_id` would close a reporting loop: the ids are equal, or
/// the proposed manager is a transitive report of the employee. Must
/// run before any manager reassignment is committed.
pub fn would_create_cycle(
    employees: &[employee::Model],
    employee_id: Uuid,
    proposed_manager_id: Uuid,
) -> bool {
    if employee_id == proposed_manager_id {
        return true;
    }
    let reports = reports_index(employees);
    let mut stack = vec![employee_id];
    let mut visited: HashSet<Uuid> = HashSet::new();
    while let Some(current) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if let Some(children) = reports.get(&current) {
            for child in children {
                if *child == proposed_manager_id {
                    return true;
                }
                stack.push(*child);
            }
        }
    }
    false
}

/// Direct reports per manager, preserving input order.
fn reports_index(employees: &[employee::Model]) -> HashMap<Uuid, Vec<Uuid>> {
    let mut index: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for e in employees {
        if let Some(manager_id) = e.manager_id {
            index.entry(manager_id).or_default().push(e.id);
        }
    }
    index
}

fn subtree_width(
    id: Uuid,
    reports: &HashMap<Uuid, Vec<Uuid>>,
    widths: &mut HashMap<Uuid, u32>,
    in_progress: &mut HashSet<Uuid>,
) -> u32 {
    if let Some(width) = widths.get(&id) {
        return *width;
    }
    if !in_progress.insert(id) {
        // Back-edge in defective stored data; count nothing rather
        // than recurse forever.
        return 0;
    }
    let width = match reports.get(&id) {
        None => 1,
        Some(children) => children
            .iter()
            .map(|child| subtree_width(*child, reports, widths, in_progress))
            .sum::<u32>()
            .max(1),
    };
    in_progress.remove(&id);
    widths.insert(id, width);
    width
}

fn place(
    id: Uuid,
    level: u32,
    offset: u32,
    reports: &HashMap<Uuid, Vec<Uuid>>,
    widths: &HashMap<Uuid, u32>,
    visited: &mut HashSet<Uuid>,
    nodes: &mut Vec<LayoutNode>,
) {
    if !visited.insert(id) {
        return;
    }
    let width = widths.get(&id).copied().unwrap_or(1);
    nodes.push(LayoutNode {
        id,
        level,
        x: (offset as f64 + width as f64 / 2.0) * SUBTREE_UNIT,
        y: level as f64 * LEVEL_HEIGHT,
        subtree_width: width,
    });
    let mut child_offset = offset;
    if let Some(children) = reports.get(&id) {
        for child in children {
            place(
                *child,
                level + 1,
                child_offset,
                reports,
                widths,
                visited,
                nodes,
            );
            child_offset += widths.get(child).copied().unwrap_or(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use entity::employee;
    use uuid::Uuid;

    use super::*;

    fn worker(name: &str, manager_id: Option<Uuid>) -> employee::Model {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap().into();
        employee::Model {
            id: Uuid::new_v4(),
            name: name.to_string(),
            title: "Engineer".to_string(),
            department: "Engineering".to_string(),
            email: format!("{}@company.com", name.to_lowercase().replace(' ', ".")),
            phone: None,
            hire_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            salary: 90_000,
            status: employee::Status::Active,
            manager_id,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    /// ceo -> vp -> manager -> engineer, plus a second vp branch.
    fn four_levels() -> Vec<employee::Model> {
        let ceo = worker("Ceo", None);
        let vp = worker("Vp One", Some(ceo.id));
        let vp_two = worker("Vp Two", Some(ceo.id));
        let manager = worker("Manager", Some(vp.id));
        let engineer = worker("Engineer", Some(manager.id));
        vec![ceo, vp, vp_two, manager, engineer]
    }

    fn by_name<'a>(list: &'a [employee::Model], name: &str) -> &'a employee::Model {
        list.iter().find(|e| e.name == name).unwrap()
    }

    #[test]
    fn cycle_guard_rejects_descendants_and_self() {
        let list = four_levels();
        let vp = by_name(&list, "Vp One");
        let engineer = by_name(&list, "Engineer");
        let vp_two = by_name(&list, "Vp Two");

        assert!(would_create_cycle(&list, vp.id, engineer.id));
        assert!(would_create_cycle(&list, vp.id, vp.id));
        assert!(!would_create_cycle(&list, vp.id, vp_two.id));
        assert!(!would_create_cycle(&list, engineer.id, vp.id));
    }

    #[test]
    fn no_employee_is_its_own_transitive_report() {
        let list = four_levels();
        for e in &list {
            let mut reachable = Vec::new();
            let mut stack = vec![e.id];
            while let Some(current) = stack.pop() {
                for report in list.iter().filter(|r| r.manager_id == Some(current)) {
                    reachable.push(report.id);
                    stack.push(report.id);
                }
            }
            assert!(!reachable.contains(&e.id));
        }
    }

    #[test]
    fn levels_follow_the_manager_chain() {
        let list = four_levels();
        let laid_out = layout(&list);
        let level_of = |name: &str| {
            let id = by_name(&list, name).id;
            laid_out.nodes.iter().find(|n| n.id == id).unwrap().level
        };
        assert_eq!(level_of("Ceo"), 0);
        assert_eq!(level_of("Vp One"), 1);
        assert_eq!(level_of("Vp Two"), 1);
        assert_eq!(level_of("Manager"), 2);
        assert_eq!(level_of("Engineer"), 3);
        assert_eq!(laid_out.edges.len(), 4);
    }

    #[test]
    fn sibling_subtrees_never_overlap() {
        // Root with two branches: one of width two, one leaf.
        let root = worker("Root", None);
        let wide = worker("Wide", Some(root.id));
        let leaf_a = worker("Leaf A", Some(wide.id));
        let leaf_b = worker("Leaf B", Some(wide.id));
        let narrow = worker("Narrow", Some(root.id));
        let list = vec![root, wide, leaf_a, leaf_b, narrow];

        let laid_out = layout(&list);
        let x_of = |name: &str| {
            let id = by_name(&list, name).id;
            laid_out.nodes.iter().find(|n| n.id == id).unwrap().x
        };

        // Wide branch spans units [0, 2); narrow sits in [2, 3).
        assert_eq!(x_of("Wide"), 1.0 * SUBTREE_UNIT);
        assert_eq!(x_of("Leaf A"), 0.5 * SUBTREE_UNIT);
        assert_eq!(x_of("Leaf B"), 1.5 * SUBTREE_UNIT);
        assert_eq!(x_of("Narrow"), 2.5 * SUBTREE_UNIT);
        assert_eq!(x_of("Root"), 1.5 * SUBTREE_UNIT);

        // No two nodes on the same level closer than one unit.
        for a in &laid_out.nodes {
            for b in &laid_out.nodes {
                if a.id != b.id && a.level == b.level {
                    assert!((a.x - b.x).abs() >= SUBTREE_UNIT);
                }
            }
        }
    }

    #[test]
    fn multiple_roots_form_a_forest() {
        let first = worker("First Root", None);
        let second = worker("Second Root", None);
        let report = worker("Report", Some(second.id));
        let list = vec![first, second, report];

        let laid_out = layout(&list);
        let roots: Vec<_> = laid_out.nodes.iter().filter(|n| n.level == 0).collect();
        assert_eq!(roots.len(), 2);
        assert!((roots[0].x - roots[1].x).abs() >= SUBTREE_UNIT);
    }

    #[test]
    fn orphaned_managers_fall_back_to_roots() {
        let ghost = Uuid::new_v4();
        let orphan = worker("Orphan", Some(ghost));
        let list = vec![orphan];

        let laid_out = layout(&list);
        assert_eq!(laid_out.nodes.len(), 1);
        assert_eq!(laid_out.nodes[0].level, 0);
        assert!(laid_out.edges.is_empty());
    }
}
