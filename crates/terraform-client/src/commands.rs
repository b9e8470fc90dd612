//! Logical Terraform command names and flag lookup

/// `terraform version`
pub const VERSION: &str = "version";
/// `terraform init`
pub const INIT: &str = "init";
/// `terraform plan`
pub const PLAN: &str = "plan";
/// `terraform apply`
pub const APPLY: &str = "apply";
/// `terraform destroy`
pub const DESTROY: &str = "destroy";
/// `terraform output`
pub const OUTPUT: &str = "output";

/// Extra flag that makes a command safe to run unattended, if it needs one
///
/// Pure lookup: `apply` must not prompt for confirmation, `destroy` must not
/// prompt either, and `output` is asked for its machine-readable form.
pub fn non_interactive_flag(command: &str) -> Option<&'static str> {
    match command {
        APPLY => Some("-auto-approve"),
        DESTROY => Some("-force"),
        OUTPUT => Some("-json"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_cover_the_prompting_commands() {
        assert_eq!(non_interactive_flag(APPLY), Some("-auto-approve"));
        assert_eq!(non_interactive_flag(DESTROY), Some("-force"));
        assert_eq!(non_interactive_flag(OUTPUT), Some("-json"));
        assert_eq!(non_interactive_flag(INIT), None);
        assert_eq!(non_interactive_flag(PLAN), None);
        assert_eq!(non_interactive_flag(VERSION), None);
    }
}
