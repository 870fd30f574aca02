#[path = "../../navisense-planner/tests/wizard_flow.rs"]
mod wizard_flow;

#[path = "../../navisense-planner/tests/substitution_paths.rs"]
mod substitution_paths;

#[path = "../../navisense-planner/tests/budget_views.rs"]
mod budget_views;
