/*!
# Site Lookup

An internal web tool for looking up company sites and per-brand port
matrices. Data is never typed in row by row: an admin pastes whole
spreadsheet selections into the front end, and the server parses the paste
into header-keyed records.

## Architecture

The application follows a client-server architecture:

### Frontend Layer
- Static HTML/JS served from `public/`
- Search box with mode selector (site number, address, city, brand, IP)
- Admin menu (passphrase-gated) for pasting site and matrix uploads

### Backend Layer
- **Technologies**: Rust, axum
- **Core Components**:
  - Spreadsheet Parser - Converts pasted tab/comma text into records
  - Store - In-memory site list and brand matrices with JSON persistence
  - Search Engine - Mode-specific scans over the site list, capped at 50
  - HTTP API - Read endpoints plus admin upload endpoints

### Data Persistence Layer
- Two pretty-printed JSON files beside the process (`data.json`,
  `port-matrices.json`), each rewritten whole on upload
- Atomic rewrite (temp file + rename), loaded once at startup

## Modules

- **parser**: pasted-spreadsheet text to header-keyed records
- **store**: owning state for sites and matrices, load/replace/persist
- **search**: search modes and the scan itself
- **app**: routing and request handlers
- **config**: environment-driven configuration
- **error**: crate error type

## REST API Endpoints

- `GET /` - Front-end entry page (static)
- `GET /api/data` - Full dump of sites and matrices
- `GET /api/stats` - Site/brand counts and the FortiVoice URL template
- `GET /api/matrices` - Port matrices only
- `GET /api/search?q=&mode=` - Search the site list
- `POST /api/data` - Replace the site list from pasted text
- `POST /api/matrix` - Replace one brand's port matrix from pasted text
- `POST /api/admin/verify` - Check the admin passphrase
*/

pub mod app;
pub mod config;
pub mod error;
pub mod parser;
pub mod search;
pub mod store;

pub use config::Config;
pub use error::{LookupError, Result};
pub use parser::Record;
pub use search::{SEARCH_LIMIT, SearchMode};
pub use store::Store;
