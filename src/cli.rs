use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "run_good",
    version = "1.0",
    about = "Command-line front end for the GOOD GNSS observations and products downloader",
    long_about = "run_good turns GOOD download options into a gamp_GOOD.cfg file under the main directory and runs run_GAMP_GOOD with it.",
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// Write the configuration file without launching the downloader
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Suppress informational output and the progress spinner
    #[arg(long)]
    pub quiet: bool,

    /// GOOD options, e.g. -dir_main <path> -time <yyyy> <doy> <ndays> -ftp <archive>
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub tokens: Vec<String>,
}

pub const USAGE: &str = r"
 To run GOOD software for GNSS observations and products downloading

 USAGE: run_good [--dry-run] [--quiet] -dir_main <dir_main_path> -time <yyyy> <doy> <ndays> -ftp <FTP_archive>
           -obs <data_type> <source> <site_list> <start_hour> <nhours>
           -nav <data_type> <nav_type> <source> <start_hour> <nhours>
           -orbclk <source> <start_hour> <nhours> -eop <source> <start_hour> <nhours>
           -obx <source> -dsb <source> -osb <source> -snx -ion <source> -roti -trop <source> <site_list> -atx

 OPTIONS:
   <-dir_main>     - The root/main directory of GNSS observations and products storage, i.e., '-dir_main D:\data' under Windows or
                      '-dir_main /home/user/data' under Linux/Mac
   <-time>         - time setting, 1st: 4-digit year, 2nd: day of year, 3rd: number of consecutive days, i.e., '-time 2022 32 3'
   <-ftp>          - FTP archive, i.e., '-ftp cddis', '-ftp whu', or '-ftp ign'
   <-obs>          - [optional] GNSS observation data downloading option:
                      1st <data_type>: 'daily', 'hourly', 'highrate', '30s', '5s', or '1s';
                      2nd <source>: 'igs', 'mgex', 'igm', 'cut', 'ga', 'hk', 'ngs', 'epn', 'pbo2', 'pbo3', or 'pbo5';
                      3rd <site_list>: 'all' (observation files downloaded in the whole remote directory) or the name of
                         a site list file under the main directory (observation files downloaded site-by-site);
                      4th <start_hour>: Start hour (00, 01, 02, ...);
                      5th <nhours>: the consecutive hours, i.e., '01  3' denotes 01, 02, and 03.
                      i.e., '-obs daily igs site_igs.list 0 24' or '-obs daily igs all 0 24'
   <-nav>          - [optional] various broadcast ephemeris downloading option:
                      1st <data_type>: 'daily' or 'hourly';
                      2nd <nav_type>: 'gps', 'glo', 'bds', 'gal', 'qzs', 'irn', 'mixed3', 'mixed4', or 'all';
                      3rd <source>: 'igs', 'dlr', 'ign', 'gop', or 'wrd';
                      4th <start_hour>: Start hour (00, 01, 02, ...);
                      5th <nhours>: the consecutive hours, i.e., '01  3' denotes 01, 02, and 03.
                      i.e., '-nav daily mixed3 igs 0 3' or '-nav daily gps dlr 0 3'
   <-orbclk>       - [optional] satellite final/rapid/ultra-rapid precise orbit and clock downloading option:
                      1st <source>: IGS final: 'cod', 'emr', 'esa', 'gfz', 'grg', 'igs', 'jpl', 'mit', 'all', 'cod+igs', 'cod+gfz+igs', ...;
                         MGEX final: 'cod_m', 'gfz_m', 'grg_m', 'whu_m', 'all_m', 'cod_m+gfz_m', 'grg_m+whu_m', ...;
                         rapid: 'cod_r', 'emr_r', 'esa_r', 'gfz_r', 'igs_r';
                         ultra-rapid: 'esa_u', 'gfz_u', 'igs_u', 'whu_u';
                         real-time: 'cnt';
                      2nd <start_hour>: Start hour (00, 06, 12, or 18 for esa_u and igs_u; 00, 03, 06, ... for gfz_u; 01, 02, 03, ... for whu_u);
                      3rd <nhours>: the consecutive sessions, i.e., '00  3' denotes 00, 06, and 12 for esa_u and/or igs_u, 00, 03, and 06 for gfz_u,
                         while 00, 01, and 02 for whu_u.
                      i.e., '-orbclk igs 0 3' or '-orbclk igs+cod+cod_m 0 3'
   <-eop>          - [optional] Earth rotation/orientation parameter (ERP/EOP) downloading option:
                      1st <source>: final: 'cod', 'emr', 'esa', 'gfz', 'grg', 'igs', 'jpl', 'mit';
                         ultra-rapid: 'esa_u', 'gfz_u', 'igs_u';
                      2nd <start_hour>: Start hour (00, 06, 12, or 18 for esa_u and igs_u; 00, 03, 06, ... for gfz_u);
                      3rd <nhours>: the consecutive sessions, i.e., '00  3' denotes 00, 06, and 12 for esa_u and/or igs_u, 00, 03, and 06 for gfz_u.
                      i.e., '-eop igs 0 3' or '-eop igs_u 0 3'
   <-obx>          - [optional] ORBEX (ORBit EXchange format) for satellite attitude information downloading option:
                      1st <source>: final/rapid: 'cod_m', 'gfz_m', 'grg_m', 'whu_m', 'all_m';
                         real-time: 'cnt'
   <-dsb>          - [optional] Differential code/signal bias (DCB/DSB) downloading option:
                      1st <source>: 'cod', 'cas', 'all'
   <-osb>          - [optional] Observable-specific signal bias (OSB) downloading option:
                      1st <source>: final/rapid: 'cod_m', 'gfz_m', 'grg_m', 'whu_m', 'all_m';
                         real-time: 'cnt'
   <-snx>          - [optional] IGS weekly SINEX downloading option
   <-ion>          - [optional] Global ionosphere map (GIM) downloading option:
                      1st <source>: final: 'cas', 'cod', 'emr', 'esa', 'igs', 'jpl', 'upc', 'all', 'cas+cod', 'cas+cod+igs', ...;
                         rapid: 'cas_r', 'cod_r', 'esa_r', 'igs_r', 'jpl_r', 'upc_r', 'all_r', 'cas_r+cod_r', 'cas_r+cod_r+igs_r', ...;
                         hourly rapid: 'emr_hr', 'upc_hr';
                         15-min rapid: 'upc_0.25hr';
                         predicted: 'cod_1d', 'cod_2d'
   <-roti>         - [optional] Rate of TEC index (ROTI) downloading option
   <-trop>         - [optional] CODE/IGS tropospheric product downloading option:
                      1st <source>: 'igs' or 'cod';
                      2nd <site_list>: 'all' (files downloaded in the whole remote directory) or the name of a site list
                         file under the main directory (files downloaded site-by-site).
   <-atx>          - [optional] ANTEX format antenna phase center correction downloading option

   --dry-run       - write gamp_GOOD.cfg without launching run_GAMP_GOOD (must come before the GOOD options)
   --quiet         - suppress informational output (must come before the GOOD options)

 EXAMPLES: run_good -dir_main D:\data -time 2022 32 3 -ftp cddis -obs daily igs site_igs.list 0 24
           run_good -dir_main D:\data -time 2022 32 3 -ftp cddis -obs highrate igs site_igs.list 0 24
           run_good -dir_main D:\data -time 2022 32 3 -ftp whu -nav daily mixed3 igs 0 24
           run_good -dir_main D:\data -time 2022 32 3 -ftp whu -orbclk igs 0 24 -eop igs 0 24
           run_good -dir_main D:\data -time 2022 32 3 -ftp whu -snx -roti -atx
           run_good -dir_main D:\data -time 2022 32 3 -ftp whu -obs daily igs site_igs.list 0 24 -nav daily mixed3 igs 0 24
              -orbclk igs 0 24 -eop igs 0 24 -obx cod_m -dsb cod -snx -ion all -roti -trop igs site_igs.list -atx

 To get help, type:
           run_good
 or        run_good -h
";
