use embedscape_core::Criteria;

pub(crate) fn cmd_criteria(json: bool) -> anyhow::Result<()> {
    let names = Criteria::valid_names();
    if json {
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }
    for name in names {
        if name == Criteria::default().name() {
            println!("{name} (default)");
        } else {
            println!("{name}");
        }
    }
    Ok(())
}
