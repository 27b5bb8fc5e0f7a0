/// Tests for config module
#[cfg(test)]
mod tests {
    use crate::cli::CliArgs;
    use crate::config::*;
    use crate::export::OutputFormat;
    use chrono::{NaiveDate, NaiveDateTime};
    use std::io::Write;
    use std::path::PathBuf;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 1).unwrap().and_hms_opt(9, 30, 0).unwrap()
    }

    fn args() -> CliArgs {
        CliArgs {
            report: Some("inactive_users".to_string()),
            source: vec![PathBuf::from("users.json")],
            ..CliArgs::default()
        }
    }

    #[test]
    fn test_defaults_without_config() {
        let plan = plan_from(&args(), &FileConfig::default(), now()).expect("Should build plan");

        assert_eq!(plan.report, "inactive-users");
        assert_eq!(plan.format, OutputFormat::Xlsx);
        assert_eq!(plan.output, PathBuf::from("inactive-users.xlsx"));
        assert_eq!(plan.context.as_of, now().date());
        assert_eq!(plan.context.timestamp_format, "%Y-%m-%d %H:%M:%S");
        assert_eq!(plan.context.organization, None);
        assert!(plan.style.zebra);
        assert_eq!(plan.sort, None);
    }

    #[test]
    fn test_unknown_report_is_rejected() {
        let args = CliArgs { report: Some("payroll".to_string()), ..args() };
        let err = plan_from(&args, &FileConfig::default(), now()).unwrap_err();
        assert!(err.contains("Unknown report 'payroll'"), "{}", err);
    }

    #[test]
    fn test_file_settings_apply() {
        let file: FileConfig = toml::from_str(
            r##"
            organization = "Acme Corp"
            timestamp_format = "%d/%m/%Y"

            [sheet]
            zebra = false
            header_color = "#1F4E78"

            [palette]
            bad = "FF0000"
            "##,
        )
        .unwrap();

        let plan = plan_from(&args(), &file, now()).unwrap();
        assert_eq!(plan.context.organization.as_deref(), Some("Acme Corp"));
        assert_eq!(plan.context.timestamp_format, "%d/%m/%Y");
        assert!(!plan.style.zebra);
        assert_eq!(plan.style.header_color, 0x1F4E78);
        assert_eq!(plan.style.palette.bad, 0xFF0000);
        assert_eq!(plan.style.palette.good, 0xC6EFCE);
    }

    #[test]
    fn test_cli_flags_override_file() {
        let file = FileConfig {
            organization: Some("From File".to_string()),
            sheet: SheetSection { zebra: Some(true), ..SheetSection::default() },
            ..FileConfig::default()
        };
        let args = CliArgs {
            organization: Some("From Flag".to_string()),
            no_zebra: true,
            as_of: NaiveDate::from_ymd_opt(2026, 1, 15),
            sort_by: Some("Days Inactive".to_string()),
            descending: true,
            ..args()
        };

        let plan = plan_from(&args, &file, now()).unwrap();
        assert_eq!(plan.context.organization.as_deref(), Some("From Flag"));
        assert!(!plan.style.zebra);
        assert_eq!(plan.context.as_of, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
        assert_eq!(plan.sort, Some(("Days Inactive".to_string(), true)));
    }

    #[test]
    fn test_sort_column_must_exist() {
        let args = CliArgs { sort_by: Some("Salary".to_string()), ..args() };
        let err = plan_from(&args, &FileConfig::default(), now()).unwrap_err();
        assert!(err.contains("--sort-by 'Salary'"), "{}", err);
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let file = FileConfig {
            palette: PaletteSection { warning: Some("orange".to_string()), ..PaletteSection::default() },
            ..FileConfig::default()
        };
        let err = plan_from(&args(), &file, now()).unwrap_err();
        assert!(err.starts_with("palette.warning"), "{}", err);

        let file = FileConfig { timestamp_format: Some("%Y-%Q".to_string()), ..FileConfig::default() };
        assert!(plan_from(&args(), &file, now()).is_err());
    }

    #[test]
    fn test_timezone_specifiers_are_rejected() {
        for pattern in ["%Y %z", "%Y-%m-%d %:z", "%H:%M %Z"] {
            let file = FileConfig { timestamp_format: Some(pattern.to_string()), ..FileConfig::default() };
            let err = plan_from(&args(), &file, now()).unwrap_err();
            assert!(err.contains("cannot be rendered"), "{}: {}", pattern, err);
        }

        assert!(validate_timestamp_format("%Y-%m-%d %H:%M", now()).is_ok());
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#4472C4"), Ok(0x4472C4));
        assert_eq!(parse_color("0xf2f2f2"), Ok(0xF2F2F2));
        assert_eq!(parse_color(" C6EFCE "), Ok(0xC6EFCE));
        assert!(parse_color("#FFF").is_err());
        assert!(parse_color("GGGGGG").is_err());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<FileConfig, _> = toml::from_str("[sheet]\nzebro = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_build_plan_with_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "organization = \"Acme\"").unwrap();

        let args = CliArgs { config: Some(file.path().to_path_buf()), ..args() };
        let plan = build_export_plan(&args).expect("Should build plan");
        assert_eq!(plan.context.organization.as_deref(), Some("Acme"));
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let args = CliArgs { config: Some(PathBuf::from("/no/such/config.toml")), ..args() };
        let err = build_export_plan(&args).unwrap_err();
        assert!(err.contains("Config file not found"), "{}", err);
    }
}
