// Shared fixtures for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Earlier layout: separate State / County columns
pub const SUMMARY_2016: &str = "\
Electric Emergency and Disturbance Report 2016,,,,,,,
Date Event Began,Time Event Began,Date of Restoration,Time of Restoration,State,County,Event Type,Number of Customers Affected
8/12/2016,6:00 AM,8/15/2016,6:00 PM,Louisiana,Orleans Parish,Severe Weather - Flooding,52000
";

pub const SUMMARY_2019: &str = "\
Electric Emergency and Disturbance Report 2019,,,,,,,
Month,Date Event Began,Time Event Began,Date of Restoration,Time of Restoration,Area Affected,Event Type,Number of Customers Affected

January,1/5/2019,2:30 PM,1/6/2019,10:00 AM,\"Florida: Duval, Orange\",Severe Weather,500
January,1/9/2019,8:15 AM,1/9/2019,5:45 PM,Texas: Harris County,Equipment Failure,1200
March,3/1/2019,Noon,3/2/2019,Midnight,Georgia,Winter Weather,\"12,000\"
";

pub const SUMMARY_2020: &str = "\
Electric Emergency and Disturbance Report 2020,,,,,,,
Month,Date Event Began,Time Event Began,Date of Restoration,Time of Restoration,Area Affected,Event Type,Number of Customers Affected
August,8/27/2020,3:00 AM,8/30/2020,9:00 PM,Florida:,Severe Weather - Hurricane,
";

pub fn write_fixture(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}
