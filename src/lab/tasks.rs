use super::{FileContents, TaskCheck};

/// A single learning objective with a pass/fail check over file contents.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub hint: Option<String>,
    pub check: TaskCheck,
}

/// A task paired with its completion for the current file contents.
#[derive(Debug, Clone, Copy)]
pub struct TaskStatus<'a> {
    pub task: &'a Task,
    pub complete: bool,
}

/// Run a task's check behind a failure boundary.
///
/// A check error is logged and reported as incomplete; it never propagates to
/// the caller.
pub fn evaluate(task: &Task, files: &FileContents) -> bool {
    match task.check.run(files) {
        Ok(complete) => complete,
        Err(err) => {
            tracing::warn!(task = %task.id, error = %format!("{err:#}"), "task check failed");
            false
        }
    }
}

/// Evaluate every task, preserving declaration order.
pub fn evaluate_all<'a>(tasks: &'a [Task], files: &FileContents) -> Vec<TaskStatus<'a>> {
    tasks
        .iter()
        .map(|task| TaskStatus {
            task,
            complete: evaluate(task, files),
        })
        .collect()
}

/// True when every status is complete; vacuously true for no tasks.
pub fn all_complete(statuses: &[TaskStatus<'_>]) -> bool {
    statuses.iter().all(|status| status.complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn task(id: &str, check: TaskCheck) -> Task {
        Task {
            id: id.to_string(),
            title: id.to_string(),
            description: String::new(),
            hint: None,
            check,
        }
    }

    fn has_done(files: &FileContents) -> anyhow::Result<bool> {
        Ok(files.get("notes").is_some_and(|c| c.contains("done")))
    }

    fn always_fails(_: &FileContents) -> anyhow::Result<bool> {
        Err(anyhow!("unexpected shape"))
    }

    #[test]
    fn faults_are_incomplete_not_errors() {
        let files = FileContents::new();
        assert!(!evaluate(&task("broken", TaskCheck::Builtin(always_fails)), &files));
    }

    #[test]
    fn evaluate_all_keeps_order_and_is_pure() {
        let tasks = vec![
            task("first", TaskCheck::Builtin(always_fails)),
            task("second", TaskCheck::Builtin(has_done)),
        ];
        let mut files = FileContents::new();
        files.insert("notes".to_string(), "done".to_string());
        let a = evaluate_all(&tasks, &files);
        let b = evaluate_all(&tasks, &files.clone());
        let ids: Vec<_> = a.iter().map(|s| s.task.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second"]);
        let flags: Vec<_> = a.iter().map(|s| s.complete).collect();
        assert_eq!(flags, vec![false, true]);
        assert_eq!(flags, b.iter().map(|s| s.complete).collect::<Vec<_>>());
        assert!(!all_complete(&a));
    }

    #[test]
    fn no_tasks_is_complete() {
        assert!(all_complete(&[]));
    }
}
