use crate::commands::{CommandContext, CommandResult};

pub fn run(context: &CommandContext, json: bool) -> CommandResult {
    let dashboard = match context.open_dashboard("departments") {
        Ok(dashboard) => dashboard,
        Err(result) => return result,
    };

    match dashboard.list_departments() {
        Ok(departments) if json => CommandResult::json("departments", &departments),
        Ok(departments) => CommandResult::text(departments.join("\n")),
        Err(error) => {
            CommandResult::from_application_error("departments", error, &context.correlation_id)
        }
    }
}
