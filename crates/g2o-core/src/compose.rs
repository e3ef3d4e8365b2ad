//! Category-specific mapping between GitHub items and OmniFocus tasks.
//!
//! Every managed task carries the profile's app tag and its category tag;
//! those two (plus any configured extras) are the bookkeeping tags ignored
//! when comparing a task against its item.

use chrono::{DateTime, TimeZone, Utc};

use crate::config::ProfileConfig;
use crate::deadline::{end_of_workday, infer_deadline};
use crate::model::{Category, Item, NewTask, TaskQuery};
use crate::reconcile::IgnoreTags;

/// Query selecting the tasks a category owns.
#[must_use]
pub fn task_query(category: Category, profile: &ProfileConfig) -> TaskQuery {
    TaskQuery {
        project: profile.project(category).to_string(),
        tags: vec![
            profile.app_tag.clone(),
            profile.category_tag(category).to_string(),
        ],
    }
}

/// Local-only tags to drop from the current side before comparing.
#[must_use]
pub fn ignore_tags(category: Category, profile: &ProfileConfig) -> IgnoreTags {
    let mut ignore = IgnoreTags::new();
    ignore.insert(&profile.app_tag);
    ignore.insert(profile.category_tag(category));
    ignore.extend(&profile.ignore_tags);
    ignore
}

/// Build the task to create for `item`.
///
/// `now` anchors due-date calculations; its timezone decides what "today"
/// and "end of quarter" mean.
#[must_use]
pub fn compose_task<Tz: TimeZone>(
    category: Category,
    item: &Item,
    profile: &ProfileConfig,
    now: &DateTime<Tz>,
) -> NewTask {
    let mut tags = vec![
        profile.app_tag.clone(),
        profile.category_tag(category).to_string(),
    ];

    let repo = (!item.repo.is_empty()).then(|| item.repo.clone());
    match category {
        Category::Assigned => {
            tags.extend(repo);
            tags.extend(item.labels.iter().cloned());
            tags.extend(item.milestone_tag());
        }
        Category::Review | Category::Authored => {
            tags.extend(item.labels.iter().cloned());
            tags.extend(repo);
        }
        Category::Notifications => tags.extend(repo),
    }

    let due = match category {
        Category::Assigned
            if profile.set_taskmaster_due_date && is_taskmaster(&tags, profile) =>
        {
            infer_deadline(&tags, now)
        }
        Category::Notifications if profile.set_notifications_due_date => end_of_workday(now),
        _ => None,
    };

    NewTask {
        project: profile.project(category).to_string(),
        name: item.task_name(),
        tags,
        note: item.html_url.clone(),
        due: due.map(|instant| instant.with_timezone(&Utc)),
    }
}

fn is_taskmaster(tags: &[String], profile: &ProfileConfig) -> bool {
    tags.iter()
        .any(|tag| tag.eq_ignore_ascii_case(&profile.taskmaster_task_tag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use crate::reconcile::{Keyed, current_tags, desired_tags};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn issue() -> Item {
        Item {
            key: "acme/widget#7".to_string(),
            title: "Fix login".to_string(),
            html_url: "https://github.com/acme/widget/issues/7".to_string(),
            repo: "acme/widget".to_string(),
            labels: vec!["bug".to_string()],
            milestone: Some("v2".to_string()),
            ..Item::default()
        }
    }

    fn created(task: &NewTask) -> Task {
        Task {
            id: "of-1".to_string(),
            name: task.name.clone(),
            completed: false,
            tags: task.tags.clone(),
        }
    }

    #[test]
    fn assigned_task_carries_repo_labels_and_milestone() {
        let profile = ProfileConfig::default();
        let task = compose_task(Category::Assigned, &issue(), &profile, &now());
        assert_eq!(task.project, "GitHub Issues");
        assert_eq!(task.name, "acme/widget#7 Fix login");
        assert_eq!(task.note, "https://github.com/acme/widget/issues/7");
        assert_eq!(
            task.tags,
            vec!["github", "assigned", "acme/widget", "bug", "milestone: v2"]
        );
        assert_eq!(task.due, None);
    }

    #[test]
    fn review_and_authored_tasks_use_their_own_project() {
        let profile = ProfileConfig::default();
        let review = compose_task(Category::Review, &issue(), &profile, &now());
        assert_eq!(review.project, "GitHub Reviews");
        assert_eq!(review.tags, vec!["github", "review", "bug", "acme/widget"]);

        let authored = compose_task(Category::Authored, &issue(), &profile, &now());
        assert_eq!(authored.project, "GitHub Pull Requests");
        assert_eq!(authored.tags, vec!["github", "pending", "bug", "acme/widget"]);
    }

    #[test]
    fn notification_due_today_when_enabled() {
        let profile = ProfileConfig {
            set_notifications_due_date: true,
            ..ProfileConfig::default()
        };
        let task = compose_task(Category::Notifications, &issue(), &profile, &now());
        assert_eq!(task.tags, vec!["github", "notification", "acme/widget"]);
        assert_eq!(
            task.due,
            Utc.with_ymd_and_hms(2026, 5, 4, 17, 0, 0).single()
        );
    }

    #[test]
    fn notification_has_no_due_date_by_default() {
        let task = compose_task(
            Category::Notifications,
            &issue(),
            &ProfileConfig::default(),
            &now(),
        );
        assert_eq!(task.due, None);
    }

    #[test]
    fn taskmaster_issue_gets_deadline_from_planning_tag() {
        let profile = ProfileConfig {
            set_taskmaster_due_date: true,
            ..ProfileConfig::default()
        };
        let mut item = issue();
        item.labels = vec!["TaskMaster".to_string(), "2Q".to_string()];
        let task = compose_task(Category::Assigned, &item, &profile, &now());
        assert_eq!(
            task.due,
            Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).single()
        );
    }

    #[test]
    fn deadline_requires_taskmaster_tag() {
        let profile = ProfileConfig {
            set_taskmaster_due_date: true,
            ..ProfileConfig::default()
        };
        let mut item = issue();
        item.labels = vec!["2Q".to_string()];
        let task = compose_task(Category::Assigned, &item, &profile, &now());
        assert_eq!(task.due, None);
    }

    #[test]
    fn unknown_repo_adds_no_empty_tag() {
        let item = Item {
            repo: String::new(),
            ..issue()
        };
        let task = compose_task(Category::Notifications, &item, &ProfileConfig::default(), &now());
        assert_eq!(task.tags, vec!["github", "notification"]);
    }

    #[test]
    fn query_selects_project_and_bookkeeping_tags() {
        let query = task_query(Category::Notifications, &ProfileConfig::default());
        assert_eq!(query.project, "GitHub Notifications");
        assert_eq!(query.tags, vec!["github", "notification"]);
    }

    #[test]
    fn created_task_is_equivalent_to_its_item() {
        let profile = ProfileConfig {
            ignore_tags: vec!["flagged".to_string()],
            ..ProfileConfig::default()
        };
        for category in Category::ALL {
            let mut item = issue();
            if matches!(category, Category::Review | Category::Authored) {
                // Pull request items are fetched without a milestone.
                item.milestone = None;
            }
            let task = created(&compose_task(category, &item, &profile, &now()));
            let ignore = ignore_tags(category, &profile);
            assert_eq!(task.key(), item.key());
            if category == Category::Notifications {
                // Notification tasks only carry the repository.
                assert!(current_tags(&task, &ignore).contains("acme/widget"));
            } else {
                assert_eq!(
                    current_tags(&task, &ignore),
                    desired_tags(&item),
                    "category {category}"
                );
            }
        }
    }

    #[test]
    fn ignore_list_includes_configured_extras() {
        let profile = ProfileConfig {
            ignore_tags: vec!["Flagged".to_string()],
            ..ProfileConfig::default()
        };
        let ignore = ignore_tags(Category::Review, &profile);
        assert!(ignore.contains("github"));
        assert!(ignore.contains("review"));
        assert!(ignore.contains("flagged"));
        assert!(!ignore.contains("assigned"));
    }
}
