//! Property tests for phase monotonicity

use proptest::prelude::*;
use staffing_workflow::{
    Consultant, ExecutionPhase, FailSoft, NewProject, ProjectPhase, StoreSettings, WorkflowStore,
};

#[derive(Debug, Clone)]
enum Step {
    Advance(usize, Option<usize>),
    Toggle(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0..ProjectPhase::ALL.len(), proptest::option::of(0..ExecutionPhase::ALL.len()))
            .prop_map(|(phase, exec)| Step::Advance(phase, exec)),
        (0..3usize).prop_map(Step::Toggle),
    ]
}

fn store() -> WorkflowStore {
    let mut store = WorkflowStore::new(StoreSettings::default());
    store
        .add_consultants(vec![
            Consultant::new("c0", "Sarah Jensen", "Developer"),
            Consultant::new("c1", "Michael Chen", "Designer"),
            Consultant::new("c2", "Aisha Patel", "Data Scientist"),
        ])
        .unwrap();
    store
        .add_project(NewProject::new("Portal", "2025-05-10", "2025-07-30").with_id("P"))
        .unwrap();
    store.assign_consultants_to_project("P", &["c0", "c1", "c2"]).unwrap();
    store
}

proptest! {
    #[test]
    fn phase_never_moves_backward(steps in proptest::collection::vec(step(), 1..40)) {
        let mut store = store();
        let mut last = store.project("P").unwrap().workflow_phase();

        for step in steps {
            match step {
                Step::Advance(phase, exec) => {
                    let exec = exec.map(|i| ExecutionPhase::ALL[i]);
                    store.advance_project_phase("P", ProjectPhase::ALL[phase], exec).fail_soft();
                },
                Step::Toggle(i) => {
                    store.toggle_consultant_selection("P", &format!("c{i}")).fail_soft();
                },
            }

            let project = store.project("P").unwrap();
            let phase = project.workflow_phase();
            prop_assert!(phase >= last);
            prop_assert_eq!(project.progress(), phase.progress());
            prop_assert_eq!(project.status(), phase.status());
            prop_assert_eq!(project.execution_phase().is_some(), phase == ProjectPhase::InProgress);
            last = phase;
        }
    }

    #[test]
    fn pruned_phases_keep_only_selected(steps in proptest::collection::vec(step(), 1..40)) {
        let mut store = store();

        for step in steps {
            let before = store.project("P").unwrap().workflow_phase();
            let advanced = match step {
                Step::Advance(phase, exec) => {
                    let exec = exec.map(|i| ExecutionPhase::ALL[i]);
                    store.advance_project_phase("P", ProjectPhase::ALL[phase], exec).is_ok()
                },
                Step::Toggle(i) => {
                    store.toggle_consultant_selection("P", &format!("c{i}")).fail_soft();
                    false
                },
            };

            let project = store.project("P").unwrap();
            let entered_pruning_phase = matches!(
                project.workflow_phase(),
                ProjectPhase::ProfileDelivery | ProjectPhase::InProgress
            );
            if advanced && entered_pruning_phase && project.workflow_phase() != before {
                prop_assert!(project.matched_consultants().iter().all(|m| m.selected));
            }
        }
    }
}
