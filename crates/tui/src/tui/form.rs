use taskdeck_core::model::{Priority, Tag, Task, TaskDraft};

use super::buffer::TextBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormField {
    Title,
    Description,
    Priority,
    Tags,
}

impl FormField {
    const ORDER: [Self; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Tags,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }
}

/// Create/edit form. `editing` carries the task id while editing; `None`
/// means the submit creates a new task.
#[derive(Debug)]
pub(crate) struct TaskForm {
    pub(crate) editing: Option<i64>,
    pub(crate) focus: FormField,
    pub(crate) title: TextBuffer,
    pub(crate) description: TextBuffer,
    pub(crate) priority: Priority,
    pub(crate) tag_ids: Vec<i64>,
    pub(crate) tag_cursor: usize,
    pub(crate) error: Option<String>,
}

impl TaskForm {
    pub(crate) fn create() -> Self {
        Self {
            editing: None,
            focus: FormField::Title,
            title: TextBuffer::new(),
            description: TextBuffer::new(),
            priority: Priority::default(),
            tag_ids: Vec::new(),
            tag_cursor: 0,
            error: None,
        }
    }

    pub(crate) fn edit(task: &Task) -> Self {
        let mut title = TextBuffer::new();
        title.set(task.title.clone());
        let mut description = TextBuffer::new();
        description.set(task.description.clone().unwrap_or_default());
        Self {
            editing: Some(task.id),
            focus: FormField::Title,
            title,
            description,
            priority: task.priority,
            tag_ids: task.tag_ids(),
            tag_cursor: 0,
            error: None,
        }
    }

    pub(crate) fn draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.as_str().to_string(),
            description: self.description.as_str().to_string(),
            priority: self.priority,
            tag_ids: self.tag_ids.clone(),
        }
    }

    pub(crate) fn next_field(&mut self) {
        let next = (self.focus.index() + 1) % FormField::ORDER.len();
        self.focus = FormField::ORDER[next];
    }

    pub(crate) fn prev_field(&mut self) {
        let idx = self.focus.index();
        let prev = if idx == 0 {
            FormField::ORDER.len() - 1
        } else {
            idx - 1
        };
        self.focus = FormField::ORDER[prev];
    }

    pub(crate) fn focused_buffer(&mut self) -> Option<&mut TextBuffer> {
        match self.focus {
            FormField::Title => Some(&mut self.title),
            FormField::Description => Some(&mut self.description),
            _ => None,
        }
    }

    pub(crate) fn cycle_priority(&mut self, forward: bool) {
        let idx = Priority::ALL
            .iter()
            .position(|p| *p == self.priority)
            .unwrap_or(0);
        let len = Priority::ALL.len();
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        self.priority = Priority::ALL[next];
    }

    pub(crate) fn tag_cursor_next(&mut self, catalog_len: usize) {
        if catalog_len == 0 {
            return;
        }
        self.tag_cursor = (self.tag_cursor + 1) % catalog_len;
    }

    pub(crate) fn tag_cursor_prev(&mut self, catalog_len: usize) {
        if catalog_len == 0 {
            return;
        }
        self.tag_cursor = (self.tag_cursor + catalog_len - 1) % catalog_len;
    }

    pub(crate) fn toggle_tag_under_cursor(&mut self, catalog: &[Tag]) {
        if let Some(tag) = catalog.get(self.tag_cursor) {
            if self.tag_ids.contains(&tag.id) {
                self.tag_ids.retain(|id| *id != tag.id);
            } else {
                self.tag_ids.push(tag.id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut form = TaskForm::create();
        assert_eq!(form.focus, FormField::Title);
        form.next_field();
        assert_eq!(form.focus, FormField::Description);
        form.prev_field();
        form.prev_field();
        assert_eq!(form.focus, FormField::Tags);
        form.next_field();
        assert_eq!(form.focus, FormField::Title);
    }

    #[test]
    fn edit_form_seeds_from_the_task() {
        let stamp = Utc::now();
        let task = Task {
            id: 7,
            title: "Water plants".into(),
            description: Some("the big ones".into()),
            completed: false,
            priority: Priority::P2,
            tags: vec![Tag {
                id: 3,
                name: "home".into(),
                color: "#fff".into(),
                created_at: stamp,
            }],
            created_at: stamp,
            updated_at: stamp,
        };
        let form = TaskForm::edit(&task);
        assert_eq!(form.editing, Some(7));
        let draft = form.draft();
        assert_eq!(draft.title, "Water plants");
        assert_eq!(draft.description, "the big ones");
        assert_eq!(draft.priority, Priority::P2);
        assert_eq!(draft.tag_ids, vec![3]);
    }

    #[test]
    fn priority_cycles_in_both_directions() {
        let mut form = TaskForm::create();
        assert_eq!(form.priority, Priority::P3);
        form.cycle_priority(true);
        assert_eq!(form.priority, Priority::P1);
        form.cycle_priority(false);
        assert_eq!(form.priority, Priority::P3);
    }

    #[test]
    fn tag_toggle_tracks_the_cursor() {
        let stamp = Utc::now();
        let catalog = vec![
            Tag {
                id: 2,
                name: "home".into(),
                color: "#fff".into(),
                created_at: stamp,
            },
            Tag {
                id: 5,
                name: "errands".into(),
                color: "#fff".into(),
                created_at: stamp,
            },
        ];
        let mut form = TaskForm::create();
        form.toggle_tag_under_cursor(&catalog);
        form.tag_cursor_next(catalog.len());
        form.toggle_tag_under_cursor(&catalog);
        assert_eq!(form.tag_ids, vec![2, 5]);
        form.toggle_tag_under_cursor(&catalog);
        assert_eq!(form.tag_ids, vec![2]);
    }
}
