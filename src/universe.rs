//! Symbol universe scanned by every scan type.

/// Curated liquid subset of the Nifty 500, most liquid names first.
///
/// Scan plans take prefixes of this list, so order matters.
pub const NIFTY500: &[&str] = &[
    "RELIANCE.NS", "TCS.NS", "HDFCBANK.NS", "BHARTIARTL.NS", "ICICIBANK.NS", "INFY.NS",
    "SBIN.NS", "ITC.NS", "HINDUNILVR.NS", "LT.NS", "KOTAKBANK.NS", "AXISBANK.NS", "MARUTI.NS",
    "WIPRO.NS", "SUNPHARMA.NS", "ULTRACEMCO.NS", "TITAN.NS", "BAJFINANCE.NS", "ASIANPAINT.NS",
    "TATAMOTORS.NS", "M&M.NS", "HCLTECH.NS", "TECHM.NS", "INDUSINDBK.NS", "BAJAJFINSV.NS",
    "ADANIPORTS.NS", "NTPC.NS", "POWERGRID.NS", "COALINDIA.NS", "ONGC.NS", "BPCL.NS",
    "GRASIM.NS", "TATASTEEL.NS", "HINDALCO.NS", "DRREDDY.NS", "CIPLA.NS", "APOLLOHOSP.NS",
    "JSWSTEEL.NS", "EICHERMOT.NS", "HEROMOTOCO.NS", "BRITANNIA.NS", "NESTLEIND.NS",
    "TATACONSUM.NS", "ZOMATO.NS", "ADANIENT.NS", "BEL.NS", "TATAPOWER.NS", "LICI.NS",
    "BAJAJ-AUTO.NS", "SHRIRAMFIN.NS", "LTIM.NS", "PERSISTENT.NS", "COFORGE.NS", "MPHASIS.NS",
    "TATAELXSI.NS", "KPITTECH.NS", "TATATECH.NS", "OFSS.NS", "HEXAWARE.NS", "CYIENT.NS",
    "TANLA.NS", "LATENTVIEW.NS", "ROUTE.NS", "HAPPSTMNDS.NS", "BIRLASOFT.NS", "BANKBARODA.NS",
    "PNB.NS", "CANBK.NS", "FEDERALBNK.NS", "IDFCFIRSTB.NS", "BANDHANBNK.NS", "AUBANK.NS",
    "KARURVYSYA.NS", "RBLBANK.NS", "DCBBANK.NS", "CHOLAFIN.NS", "M&MFIN.NS", "LICHSGFIN.NS",
    "RECLTD.NS", "PFC.NS", "IRFC.NS", "MUTHOOTFIN.NS", "MANAPPURAM.NS", "BAJAJHLDNG.NS",
    "SBICARD.NS", "HDFCAMC.NS", "NIPPONLIFE.NS", "ICICIGI.NS", "ICICIPRULI.NS", "SBILIFE.NS",
    "HDFCLIFE.NS", "MFSL.NS", "STAR.NS", "LUPIN.NS", "BIOCON.NS", "ALKEM.NS", "TORNTPHARM.NS",
    "AUROPHARMA.NS", "DIVISLAB.NS", "ABBOTINDIA.NS", "PFIZER.NS", "SANOFI.NS", "GLENMARK.NS",
    "IPCALAB.NS", "NATCOPHARM.NS", "LAURUSLABS.NS", "GRANULES.NS", "AJANTPHARM.NS",
    "METROPOLIS.NS", "LALPATHLAB.NS", "THYROCARE.NS", "MAXHEALTH.NS", "FORTIS.NS",
    "NARAYANAHLT.NS", "MEDANTA.NS", "ASTER.NS", "GODREJCP.NS", "DABUR.NS", "MARICO.NS",
    "COLPAL.NS", "EMAMILTD.NS", "VBL.NS", "RADICO.NS", "UNITDSPR.NS", "MCDOWELL-N.NS",
    "JUBLFOOD.NS", "WESTLIFE.NS", "DEVYANI.NS", "SAPPHIRE.NS", "MRF.NS", "BALKRISIND.NS",
    "APOLLOTYRE.NS", "CEAT.NS", "MOTHERSON.NS", "BOSCHLTD.NS", "BHARATFORG.NS",
    "SUNDRMFAST.NS", "BHARAT-ELEC.NS", "TVSMOTOR.NS", "EIHOTEL.NS", "ESCORT.NS",
    "CRAFTSMAN.NS", "SUPRAJIT.NS", "SIEMENS.NS", "ABB.NS", "HAVELLS.NS", "CUMMINSIND.NS",
    "THERMAX.NS", "BHEL.NS", "BEML.NS", "GRINDWELL.NS", "CARBORUNIV.NS", "VOLTAS.NS",
    "BLUESTARCO.NS", "WHIRLPOOL.NS", "DIXON.NS", "AMBER.NS", "POLYCAB.NS", "KEI.NS",
    "FINOLEX.NS", "JKCEMENT.NS", "RAMCOCEM.NS", "HEIDELBERG.NS", "NUVOCO.NS", "SANGHI.NS",
    "OBEROIRLTY.NS", "DLF.NS", "GODREJPROP.NS", "PRESTIGE.NS", "BRIGADE.NS", "SOBHA.NS",
    "MAHLIFE.NS", "PHOENIXLTD.NS", "GAIL.NS", "IGL.NS", "MGL.NS", "PETRONET.NS",
    "HINDPETRO.NS", "ADANIGREEN.NS", "TORNTPOWER.NS", "CESC.NS", "NHPC.NS", "SJVN.NS",
    "IREDA.NS", "PIIND.NS", "DEEPAKNTR.NS", "SRF.NS", "VINATIORGA.NS", "NAVINFLUOR.NS",
    "ASTEC.NS", "AARTI.NS", "AARTIIND.NS", "ALKYLAMINE.NS", "CLEAN.NS", "FLUOROCHEM.NS",
    "JUBLINDS.NS", "BALAMINES.NS", "NEOGEN.NS", "SAIL.NS", "NATIONALUM.NS", "VEDL.NS",
    "HINDZINC.NS", "WELCORP.NS", "APLAPOLLO.NS", "RATNAMANI.NS", "GPPL.NS", "IRCTC.NS",
    "CONCOR.NS", "BLUEDART.NS", "GMRINFRA.NS", "IRB.NS", "GATEWAY.NS", "DELHIVERY.NS",
    "MAHINDRA.NS", "TATACOMM.NS", "INDIAMART.NS", "NAUKRI.NS", "JUSTDIAL.NS", "PAYTM.NS",
    "POLICYBZR.NS", "DMART.NS", "MEDPLUS.NS", "BERGEPAINT.NS", "KANSAINER.NS", "INDIGOPNTS.NS",
    "ASTRAL.NS", "PIDILITIND.NS", "KALYANKJIL.NS", "MANYAVAR.NS", "SKFINDIA.NS",
];

/// Ordered, de-duplicated symbol list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    symbols: Vec<String>,
}

impl Universe {
    /// Build from any symbol list, keeping the first occurrence of each symbol.
    pub fn new<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = std::collections::HashSet::new();
        let symbols = symbols
            .into_iter()
            .map(|s| {
                let s: String = s.into();
                s.trim().to_string()
            })
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect();
        Self { symbols }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Symbols in `[start, end)`, clipped to the universe length.
    pub fn range(&self, start: usize, end: usize) -> &[String] {
        let end = end.min(self.symbols.len());
        let start = start.min(end);
        &self.symbols[start..end]
    }

    /// First `n` symbols.
    pub fn head(&self, n: usize) -> &[String] {
        self.range(0, n)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(NIFTY500.iter().copied())
    }
}

/// Strip the exchange qualifier (`.NS` / `.BO`) from a symbol.
pub fn clean_symbol(symbol: &str) -> &str {
    symbol
        .strip_suffix(".NS")
        .or_else(|| symbol.strip_suffix(".BO"))
        .unwrap_or(symbol)
}
