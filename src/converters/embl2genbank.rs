//! EMBL to GenBank, delegated to EMBOSS `seqret` or `squizz`.

use std::ffi::OsString;

use anyhow::Result;

use crate::converters::external;
use crate::core::capability::CapabilityRequirement;
use crate::core::converter::{Conversion, Converter};
use crate::core::error::ConvertError;
use crate::core::method::MethodRegistry;
use crate::core::options::ConversionOptions;

pub struct Embl2Genbank;

impl Converter for Embl2Genbank {
    const ID: &'static str = "embl2genbank";
    const INPUT_EXT: &'static [&'static str] = &[".embl"];
    const OUTPUT_EXT: &'static [&'static str] = &[".gbk", ".genbank", ".gb"];

    fn register_methods(methods: &mut MethodRegistry) -> Result<(), ConvertError> {
        methods.register(
            Self::ID,
            "seqret",
            seqret,
            Some(CapabilityRequirement::executable("seqret")),
            true,
        )?;
        methods.register(
            Self::ID,
            "squizz",
            squizz,
            Some(CapabilityRequirement::executable("squizz")),
            false,
        )
    }
}

/// EMBOSS uniform sequence address, e.g. `embl::in.embl`
fn usa(format: &str, path: &std::path::Path) -> OsString {
    let mut address = OsString::from(format!("{format}::"));
    address.push(path.as_os_str());
    address
}

fn seqret(conversion: &Conversion<'_>, _options: &ConversionOptions) -> Result<()> {
    external::run_tool(
        "seqret",
        [
            OsString::from("-auto"),
            OsString::from("-sequence"),
            usa("embl", conversion.input()),
            OsString::from("-outseq"),
            usa("genbank", conversion.output()),
        ],
    )
}

fn squizz(conversion: &Conversion<'_>, _options: &ConversionOptions) -> Result<()> {
    external::run_to_file(
        "squizz",
        [
            OsString::from("-f"),
            OsString::from("embl"),
            OsString::from("-c"),
            OsString::from("genbank"),
            conversion.input().as_os_str().to_owned(),
        ],
        conversion.output(),
    )
}
