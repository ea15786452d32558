//! Navigation sidebar.
//!
//! Sections depend on the signed-in user: the department block is titled with
//! the user's department, the staff page is for managers and the
//! administration block is for privileged roles. Links to the current page
//! carry `aria-current="page"`, which the stylesheet highlights.

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod sidebar_test;

use leptos::prelude::*;
use leptos_router::components::A;
use okr_portal::roles;
use okr_portal::routes::AppRoute;
use okr_portal::session::SessionUser;

use crate::net::api::portal_store;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSection {
    pub label: String,
    pub items: Vec<AppRoute>,
}

/// Sidebar sections visible to `user`.
pub fn nav_sections(user: &SessionUser) -> Vec<NavSection> {
    let mut department = vec![AppRoute::DepartmentOverview, AppRoute::DepartmentOkr, AppRoute::DepartmentKpi];
    if roles::is_manager(&user.roles) {
        department.push(AppRoute::DepartmentUsers);
    }

    let mut sections = vec![
        NavSection { label: String::new(), items: vec![AppRoute::Dashboard] },
        NavSection { label: "Personal".to_owned(), items: vec![AppRoute::Profile, AppRoute::MyOkr] },
        NavSection { label: user.department_name().to_owned(), items: department },
    ];
    if user.is_admin() {
        sections.push(NavSection {
            label: "Administration".to_owned(),
            items: vec![AppRoute::AdminSettings, AppRoute::AdminDepartment],
        });
    }
    sections
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let user = portal_store().read().map(|s| s.user).unwrap_or_default();

    let sections = nav_sections(&user)
        .into_iter()
        .map(|section| {
            let links = section
                .items
                .into_iter()
                .map(|route| {
                    view! {
                        <li class="sidebar__item">
                            <A href=route.href()>{route.title()}</A>
                        </li>
                    }
                })
                .collect_view();
            let heading = (!section.label.is_empty())
                .then(|| view! { <h2 class="sidebar__heading">{section.label}</h2> });
            view! {
                <section class="sidebar__section">
                    {heading}
                    <ul>{links}</ul>
                </section>
            }
        })
        .collect_view();

    view! {
        <nav class="sidebar">
            <div class="sidebar__brand">"OKR Portal"</div>
            {sections}
        </nav>
    }
}
