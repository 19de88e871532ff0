use clap::Args;

use crate::catalog::ConverterCatalog;
use crate::cli::OutputFormat;
use crate::core::capability::CapabilityProbe;
use crate::core::converter::ConverterDescriptor;
use crate::dispatch::Dispatcher;

#[derive(Args)]
pub struct ListArgs {
    /// Only show converters with at least one usable method on this machine
    #[arg(long)]
    pub available: bool,

    /// Only show converters accepting this input extension (e.g. "fa")
    #[arg(long)]
    pub input: Option<String>,
}

/// One method row: name, default flag, requirement and availability
struct MethodRow<'a> {
    name: &'a str,
    is_default: bool,
    requirement: Option<String>,
    available: bool,
}

fn method_rows<'a>(
    catalog: &'a ConverterCatalog,
    converter: &ConverterDescriptor,
    probe: &dyn CapabilityProbe,
) -> Vec<MethodRow<'a>> {
    catalog
        .methods()
        .methods(&converter.id)
        .map(|m| MethodRow {
            name: &m.name,
            is_default: m.is_default,
            requirement: m.requirement.as_ref().map(ToString::to_string),
            available: m.requirement.as_ref().map_or(true, |r| probe.is_available(r)),
        })
        .collect()
}

pub fn run(args: ListArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::new(ConverterCatalog::builtin()?);
    let catalog = dispatcher.catalog();
    let probe = dispatcher.probe();

    if verbose {
        eprintln!("Loaded {} converters", catalog.len());
    }

    let input_filter = args
        .input
        .as_deref()
        .map(crate::core::extension::Extension::new)
        .transpose()?;

    let listed: Vec<(&ConverterDescriptor, Vec<MethodRow<'_>>)> = catalog
        .converters
        .iter()
        .filter(|c| input_filter.as_ref().map_or(true, |ext| c.input_ext.contains(ext)))
        .map(|c| (c, method_rows(catalog, c, probe)))
        .filter(|(_, rows)| !args.available || rows.iter().any(|r| r.available))
        .collect();

    match format {
        OutputFormat::Text => {
            let id_width = listed.iter().map(|(c, _)| c.id.len()).max().unwrap_or(9).max(9);
            let in_width = listed
                .iter()
                .map(|(c, _)| c.input_ext.to_string().len())
                .max()
                .unwrap_or(5)
                .max(5);
            let out_width = listed
                .iter()
                .map(|(c, _)| c.output_ext.to_string().len())
                .max()
                .unwrap_or(6)
                .max(6);

            println!("Converters ({})\n", listed.len());
            println!(
                "{:<id_w$} {:<in_w$} {:<out_w$} Methods",
                "Converter",
                "Input",
                "Output",
                id_w = id_width,
                in_w = in_width,
                out_w = out_width
            );
            println!("{}", "-".repeat(id_width + in_width + out_width + 24));

            for (c, rows) in &listed {
                let methods: Vec<String> = rows
                    .iter()
                    .map(|r| {
                        let mut label = r.name.to_string();
                        if r.is_default {
                            label.push('*');
                        }
                        if !r.available {
                            label.push_str(" (unavailable)");
                        }
                        label
                    })
                    .collect();
                println!(
                    "{:<id_w$} {:<in_w$} {:<out_w$} {}",
                    c.id,
                    c.input_ext.to_string(),
                    c.output_ext.to_string(),
                    methods.join(", "),
                    id_w = id_width,
                    in_w = in_width,
                    out_w = out_width
                );

                if verbose {
                    for r in rows {
                        if let Some(requirement) = &r.requirement {
                            println!("  └─ {}: requires {}", r.name, requirement);
                        }
                    }
                }
                for arg in c.additional_arguments() {
                    match &arg.default {
                        Some(default) => {
                            println!("  └─ {} {} (default: {})", arg.flag(), arg.help, default);
                        }
                        None => println!("  └─ {} {}", arg.flag(), arg.help),
                    }
                }
            }

            println!("\n* default method");
        }
        OutputFormat::Json => {
            let output: Vec<serde_json::Value> = listed
                .iter()
                .map(|(c, rows)| {
                    serde_json::json!({
                        "id": c.id,
                        "input_ext": c.input_ext,
                        "output_ext": c.output_ext,
                        "methods": rows.iter().map(|r| serde_json::json!({
                            "name": r.name,
                            "default": r.is_default,
                            "requires": r.requirement,
                            "available": r.available,
                        })).collect::<Vec<_>>(),
                        "arguments": c.additional_arguments().collect::<Vec<_>>(),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Tsv => {
            println!("converter\tinput_ext\toutput_ext\tmethod\tdefault\trequires\tavailable");
            for (c, rows) in &listed {
                for r in rows {
                    println!(
                        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                        c.id,
                        c.input_ext,
                        c.output_ext,
                        r.name,
                        r.is_default,
                        r.requirement.as_deref().unwrap_or(""),
                        r.available
                    );
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capability::CapabilityRequirement;

    struct NothingInstalled;

    impl CapabilityProbe for NothingInstalled {
        fn is_available(&self, _: &CapabilityRequirement) -> bool {
            false
        }
    }

    #[test]
    fn test_method_rows_mark_availability() {
        let catalog = ConverterCatalog::builtin().unwrap();
        let converter = catalog.get("fasta2phylip").unwrap();
        let rows = method_rows(&catalog, converter, &NothingInstalled);

        assert_eq!(rows[0].name, "native");
        assert!(rows[0].is_default);
        // No requirement, so usable even when nothing is installed
        assert!(rows[0].available);

        let squizz = rows.iter().find(|r| r.name == "squizz").unwrap();
        assert!(!squizz.available);
        assert_eq!(squizz.requirement.as_deref(), Some("executable 'squizz'"));
    }
}
