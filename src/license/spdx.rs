//! Built-in SPDX tables.
//!
//! License texts are not bundled; adapters that need them build their own
//! [`Registry`](super::registry::Registry) with texts attached.

/// `(id, full name, deprecated)`
pub(crate) const LICENSES: &[(&str, &str, bool)] = &[
    ("0BSD", "BSD Zero Clause License", false),
    ("AFL-3.0", "Academic Free License v3.0", false),
    ("AGPL-3.0", "GNU Affero General Public License v3.0", true),
    ("AGPL-3.0-only", "GNU Affero General Public License v3.0 only", false),
    ("AGPL-3.0-or-later", "GNU Affero General Public License v3.0 or later", false),
    ("Apache-1.1", "Apache License 1.1", false),
    ("Apache-2.0", "Apache License 2.0", false),
    ("APSL-2.0", "Apple Public Source License 2.0", false),
    ("Artistic-1.0", "Artistic License 1.0", false),
    ("Artistic-2.0", "Artistic License 2.0", false),
    ("BlueOak-1.0.0", "Blue Oak Model License 1.0.0", false),
    ("BSD-1-Clause", "BSD 1-Clause License", false),
    ("BSD-2-Clause", "BSD 2-Clause \"Simplified\" License", false),
    ("BSD-2-Clause-Patent", "BSD-2-Clause Plus Patent License", false),
    ("BSD-3-Clause", "BSD 3-Clause \"New\" or \"Revised\" License", false),
    ("BSD-3-Clause-Clear", "BSD 3-Clause Clear License", false),
    ("BSD-4-Clause", "BSD 4-Clause \"Original\" or \"Old\" License", false),
    ("BSL-1.0", "Boost Software License 1.0", false),
    ("bzip2-1.0.6", "bzip2 and libbzip2 License v1.0.6", false),
    ("CC-BY-3.0", "Creative Commons Attribution 3.0 Unported", false),
    ("CC-BY-4.0", "Creative Commons Attribution 4.0 International", false),
    ("CC-BY-SA-4.0", "Creative Commons Attribution Share Alike 4.0 International", false),
    ("CC0-1.0", "Creative Commons Zero v1.0 Universal", false),
    ("CDDL-1.0", "Common Development and Distribution License 1.0", false),
    ("CDDL-1.1", "Common Development and Distribution License 1.1", false),
    ("CPL-1.0", "Common Public License 1.0", false),
    ("curl", "curl License", false),
    ("ECL-2.0", "Educational Community License v2.0", false),
    ("eCos-2.0", "eCos license version 2.0", true),
    ("EPL-1.0", "Eclipse Public License 1.0", false),
    ("EPL-2.0", "Eclipse Public License 2.0", false),
    ("EUPL-1.1", "European Union Public License 1.1", false),
    ("EUPL-1.2", "European Union Public License 1.2", false),
    ("GFDL-1.3-only", "GNU Free Documentation License v1.3 only", false),
    ("GPL-1.0", "GNU General Public License v1.0 only", true),
    ("GPL-1.0-only", "GNU General Public License v1.0 only", false),
    ("GPL-1.0-or-later", "GNU General Public License v1.0 or later", false),
    ("GPL-2.0", "GNU General Public License v2.0 only", true),
    ("GPL-2.0-only", "GNU General Public License v2.0 only", false),
    ("GPL-2.0-or-later", "GNU General Public License v2.0 or later", false),
    ("GPL-2.0-with-autoconf-exception", "GNU General Public License v2.0 w/Autoconf exception", true),
    ("GPL-2.0-with-bison-exception", "GNU General Public License v2.0 w/Bison exception", true),
    ("GPL-2.0-with-classpath-exception", "GNU General Public License v2.0 w/Classpath exception", true),
    ("GPL-2.0-with-font-exception", "GNU General Public License v2.0 w/Font exception", true),
    ("GPL-2.0-with-GCC-exception", "GNU General Public License v2.0 w/GCC Runtime Library exception", true),
    ("GPL-3.0", "GNU General Public License v3.0 only", true),
    ("GPL-3.0-only", "GNU General Public License v3.0 only", false),
    ("GPL-3.0-or-later", "GNU General Public License v3.0 or later", false),
    ("GPL-3.0-with-autoconf-exception", "GNU General Public License v3.0 w/Autoconf exception", true),
    ("GPL-3.0-with-GCC-exception", "GNU General Public License v3.0 w/GCC Runtime Library exception", true),
    ("HPND", "Historical Permission Notice and Disclaimer", false),
    ("ICU", "ICU License", false),
    ("IJG", "Independent JPEG Group License", false),
    ("ISC", "ISC License", false),
    ("LGPL-2.0", "GNU Library General Public License v2 only", true),
    ("LGPL-2.0-only", "GNU Library General Public License v2 only", false),
    ("LGPL-2.0-or-later", "GNU Library General Public License v2 or later", false),
    ("LGPL-2.1", "GNU Lesser General Public License v2.1 only", true),
    ("LGPL-2.1-only", "GNU Lesser General Public License v2.1 only", false),
    ("LGPL-2.1-or-later", "GNU Lesser General Public License v2.1 or later", false),
    ("LGPL-3.0", "GNU Lesser General Public License v3.0 only", true),
    ("LGPL-3.0-only", "GNU Lesser General Public License v3.0 only", false),
    ("LGPL-3.0-or-later", "GNU Lesser General Public License v3.0 or later", false),
    ("Libpng", "libpng License", false),
    ("MIT", "MIT License", false),
    ("MIT-0", "MIT No Attribution", false),
    ("MPL-1.1", "Mozilla Public License 1.1", false),
    ("MPL-2.0", "Mozilla Public License 2.0", false),
    ("MPL-2.0-no-copyleft-exception", "Mozilla Public License 2.0 (no copyleft exception)", false),
    ("MS-PL", "Microsoft Public License", false),
    ("MS-RL", "Microsoft Reciprocal License", false),
    ("NCSA", "University of Illinois/NCSA Open Source License", false),
    ("Nunit", "Nunit License", true),
    ("ODbL-1.0", "Open Data Commons Open Database License v1.0", false),
    ("OFL-1.1", "SIL Open Font License 1.1", false),
    ("OpenSSL", "OpenSSL License", false),
    ("OSL-3.0", "Open Software License 3.0", false),
    ("PHP-3.01", "PHP License v3.01", false),
    ("PostgreSQL", "PostgreSQL License", false),
    ("PSF-2.0", "Python Software Foundation License 2.0", false),
    ("Python-2.0", "Python License 2.0", false),
    ("Ruby", "Ruby License", false),
    ("Sleepycat", "Sleepycat License", false),
    ("SMLNJ", "Standard ML of New Jersey License", false),
    ("StandardML-NJ", "Standard ML of New Jersey License", true),
    ("Unicode-3.0", "Unicode License v3", false),
    ("Unicode-DFS-2016", "Unicode License Agreement - Data Files and Software (2016)", false),
    ("Unlicense", "The Unlicense", false),
    ("UPL-1.0", "Universal Permissive License v1.0", false),
    ("Vim", "Vim License", false),
    ("W3C", "W3C Software Notice and License (2002-12-31)", false),
    ("WTFPL", "Do What The F*ck You Want To Public License", false),
    ("wxWindows", "wxWindows Library License", true),
    ("X11", "X11 License", false),
    ("Zlib", "zlib License", false),
    ("zlib-acknowledgement", "zlib/libpng License with Acknowledgement", false),
    ("ZPL-2.1", "Zope Public License 2.1", false),
];

/// `(id, full name, deprecated)`
pub(crate) const EXCEPTIONS: &[(&str, &str, bool)] = &[
    ("Autoconf-exception-2.0", "Autoconf exception 2.0", false),
    ("Autoconf-exception-3.0", "Autoconf exception 3.0", false),
    ("Bison-exception-2.2", "Bison exception 2.2", false),
    ("Classpath-exception-2.0", "Classpath exception 2.0", false),
    ("eCos-exception-2.0", "eCos exception 2.0", false),
    ("Font-exception-2.0", "Font exception 2.0", false),
    ("GCC-exception-2.0", "GCC Runtime Library exception 2.0", false),
    ("GCC-exception-3.1", "GCC Runtime Library exception 3.1", false),
    ("Linux-syscall-note", "Linux Syscall Note", false),
    ("LLVM-exception", "LLVM Exception", false),
    ("Nokia-Qt-exception-1.1", "Nokia Qt LGPL exception 1.1", true),
    ("OCaml-LGPL-linking-exception", "OCaml LGPL Linking Exception", false),
    ("Qt-GPL-exception-1.0", "Qt GPL exception 1.0", false),
    ("Qt-LGPL-exception-1.1", "Qt LGPL exception 1.1", false),
    ("Swift-exception", "Swift Exception", false),
    ("Universal-FOSS-exception-1.0", "Universal FOSS Exception, Version 1.0", false),
    ("WxWindows-exception-3.1", "WxWindows Library Exception 3.1", false),
];

/// Deprecated license ids (optionally with `+`) and their current expression.
pub(crate) const DEPRECATED_LICENSES: &[(&str, &str)] = &[
    ("AGPL-3.0", "AGPL-3.0-only"),
    ("AGPL-3.0+", "AGPL-3.0-or-later"),
    ("eCos-2.0", "GPL-2.0-or-later WITH eCos-exception-2.0"),
    ("GPL-1.0", "GPL-1.0-only"),
    ("GPL-1.0+", "GPL-1.0-or-later"),
    ("GPL-2.0", "GPL-2.0-only"),
    ("GPL-2.0+", "GPL-2.0-or-later"),
    ("GPL-2.0-with-autoconf-exception", "GPL-2.0-only WITH Autoconf-exception-2.0"),
    ("GPL-2.0-with-bison-exception", "GPL-2.0-only WITH Bison-exception-2.2"),
    ("GPL-2.0-with-classpath-exception", "GPL-2.0-only WITH Classpath-exception-2.0"),
    ("GPL-2.0-with-font-exception", "GPL-2.0-only WITH Font-exception-2.0"),
    ("GPL-2.0-with-GCC-exception", "GPL-2.0-only WITH GCC-exception-2.0"),
    ("GPL-3.0", "GPL-3.0-only"),
    ("GPL-3.0+", "GPL-3.0-or-later"),
    ("GPL-3.0-with-autoconf-exception", "GPL-3.0-only WITH Autoconf-exception-3.0"),
    ("GPL-3.0-with-GCC-exception", "GPL-3.0-only WITH GCC-exception-3.1"),
    ("LGPL-2.0", "LGPL-2.0-only"),
    ("LGPL-2.0+", "LGPL-2.0-or-later"),
    ("LGPL-2.1", "LGPL-2.1-only"),
    ("LGPL-2.1+", "LGPL-2.1-or-later"),
    ("LGPL-3.0", "LGPL-3.0-only"),
    ("LGPL-3.0+", "LGPL-3.0-or-later"),
    ("Nunit", "zlib-acknowledgement"),
    ("StandardML-NJ", "SMLNJ"),
    ("wxWindows", "LGPL-2.0-or-later WITH WxWindows-exception-3.1"),
];

/// Deprecated exception ids and their current id.
pub(crate) const DEPRECATED_EXCEPTIONS: &[(&str, &str)] = &[
    ("Nokia-Qt-exception-1.1", "Qt-LGPL-exception-1.1"),
];

/// Free-text spellings seen in package manifests.
pub(crate) const ALIASES: &[(&str, &str)] = &[
    ("AGPL v3", "AGPL-3.0-only"),
    ("AGPLv3", "AGPL-3.0-only"),
    ("AGPLv3+", "AGPL-3.0-or-later"),
    ("Apache 2", "Apache-2.0"),
    ("Apache 2.0", "Apache-2.0"),
    ("Apache License", "Apache-2.0"),
    ("Apache License 2.0", "Apache-2.0"),
    ("Apache License, Version 2.0", "Apache-2.0"),
    ("Apache Software License", "Apache-2.0"),
    ("Apache-2", "Apache-2.0"),
    ("Apache2", "Apache-2.0"),
    ("Apache-2.0/MIT", "Apache-2.0 OR MIT"),
    ("ASL 2.0", "Apache-2.0"),
    ("Boost", "BSL-1.0"),
    ("BSD", "BSD-3-Clause"),
    ("BSD 2-Clause", "BSD-2-Clause"),
    ("BSD 3-Clause", "BSD-3-Clause"),
    ("BSD License", "BSD-3-Clause"),
    ("BSD-2", "BSD-2-Clause"),
    ("BSD-3", "BSD-3-Clause"),
    ("CC0", "CC0-1.0"),
    ("CDDL", "CDDL-1.0"),
    ("Eclipse Public License 1.0", "EPL-1.0"),
    ("Eclipse Public License 2.0", "EPL-2.0"),
    ("EPL 2.0", "EPL-2.0"),
    ("Expat", "MIT"),
    ("FreeBSD", "BSD-2-Clause"),
    ("GNU GPL v2", "GPL-2.0-only"),
    ("GNU GPL v3", "GPL-3.0-only"),
    ("GNU LGPL v2.1", "LGPL-2.1-only"),
    ("GNU LGPL v3", "LGPL-3.0-only"),
    ("GPL", "GPL-2.0-or-later"),
    ("GPL v2", "GPL-2.0-only"),
    ("GPL v3", "GPL-3.0-only"),
    ("GPL-2.0 with classpath exception", "GPL-2.0-only WITH Classpath-exception-2.0"),
    ("GPLv2", "GPL-2.0-only"),
    ("GPLv2+", "GPL-2.0-or-later"),
    ("GPLv3", "GPL-3.0-only"),
    ("GPLv3+", "GPL-3.0-or-later"),
    ("ISC License", "ISC"),
    ("LGPL", "LGPL-2.0-or-later"),
    ("LGPL v2.1", "LGPL-2.1-only"),
    ("LGPL v3", "LGPL-3.0-only"),
    ("LGPLv2+", "LGPL-2.0-or-later"),
    ("LGPLv2.1", "LGPL-2.1-only"),
    ("LGPLv2.1+", "LGPL-2.1-or-later"),
    ("LGPLv3", "LGPL-3.0-only"),
    ("LGPLv3+", "LGPL-3.0-or-later"),
    ("MIT License", "MIT"),
    ("MIT/Apache-2.0", "MIT OR Apache-2.0"),
    ("Modified BSD", "BSD-3-Clause"),
    ("Mozilla Public License 2.0", "MPL-2.0"),
    ("MPL 2.0", "MPL-2.0"),
    ("MPLv2", "MPL-2.0"),
    ("New BSD", "BSD-3-Clause"),
    ("Public Domain", "LicenseRef-public-domain"),
    ("Python Software Foundation License", "PSF-2.0"),
    ("Simplified BSD", "BSD-2-Clause"),
    ("The MIT License", "MIT"),
    ("The Unlicense", "Unlicense"),
    ("zlib/libpng", "Zlib"),
];
