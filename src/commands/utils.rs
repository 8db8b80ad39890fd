use crate::commands::parser::Assignment;
use crate::readiness::StepStatus;
use crate::settings::values::parse_flag;
use crate::settings::{AspectRatio, BlendingAccuracy, OverrideRecord, Renderer, UpscaleMultiplier};

// One line per option, in file order
pub fn describe_record(record: &OverrideRecord) -> String {
    [
        format!("renderer           {}", record.renderer.name()),
        format!("upscale            {}x", record.upscale.value()),
        format!("aspect ratio       {}", record.aspect_ratio.legacy_name()),
        format!("blending accuracy  {}", record.blending.name()),
        format!("widescreen patches {}", record.widescreen_patches),
        format!("no-interlacing     {}", record.no_interlacing_patches),
        format!("patches            {}", record.enable_patches),
        format!("cheats             {}", record.enable_cheats),
    ]
    .join("\n")
}

// Set one option on `record`; values are matched strictly, unlike file reads
pub fn apply_assignment(record: &mut OverrideRecord, assignment: &Assignment) -> Result<(), String> {
    let value = assignment.value.as_str();
    let invalid = || format!("invalid value for {}: {}", assignment.option, value);
    let flag = || parse_flag(value).ok_or_else(invalid);

    match assignment.option.as_str() {
        "renderer" => {
            record.renderer = Renderer::ALL
                .into_iter()
                .find(|r| r.name().eq_ignore_ascii_case(value))
                .ok_or_else(invalid)?;
        }
        "upscale" => {
            let multiplier: u8 = value.trim_end_matches('x').parse().map_err(|_| invalid())?;
            if !(1..=8).contains(&multiplier) {
                return Err(invalid());
            }
            record.upscale = UpscaleMultiplier::new(multiplier);
        }
        "aspect" => {
            record.aspect_ratio = AspectRatio::ALL
                .into_iter()
                .find(|a| a.legacy_name().eq_ignore_ascii_case(value) || a.index().to_string() == value)
                .ok_or_else(invalid)?;
        }
        "blending" => {
            record.blending = BlendingAccuracy::ALL
                .into_iter()
                .find(|b| b.name().eq_ignore_ascii_case(value) || b.index().to_string() == value)
                .ok_or_else(invalid)?;
        }
        "widescreen" => record.widescreen_patches = flag()?,
        "no-interlacing" => record.no_interlacing_patches = flag()?,
        "patches" => record.enable_patches = flag()?,
        "cheats" => record.enable_cheats = flag()?,
        other => return Err(format!("unknown option: {other}")),
    }
    Ok(())
}

pub fn describe_step(status: &StepStatus) -> String {
    let mark = if status.complete { "x" } else { " " };
    format!(
        "[{}] {}: {}",
        mark,
        status.step.title(),
        status.step.description()
    )
}
