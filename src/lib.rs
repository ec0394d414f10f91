//! Workspace tooling package. It exists so `rusty-hook` can install the
//! pre-commit hooks; the routing engine lives in `crates/campus-nav-lib`.
